//! GC Core Module - Mark-and-sweep cycle management
//!
//! One call to [`Collector::collect`] runs a full, stop-the-world cycle:
//!
//! ```text
//! Idle ──▶ Marking ──▶ Sweeping ──▶ Idle
//! ```
//!
//! - **Marking** sets the mark bit of every object reachable from the roots.
//! - **Sweeping** walks a snapshot of the live set once. Marked objects have
//!   their bit cleared and survive; unmarked objects are released.
//!
//! Between cycles the collector is Idle and no object is marked.
//!
//! The collector never decides when to run. The interpreter calls `collect`
//! at points where its root set is complete, for example after an
//! allocation failed with `OutOfMemory`.

use crate::config::GcConfig;
use crate::error::{BgcError, Result};
use crate::heap::Heap;
use crate::logging::{GcEvent, GcLogger, GcLoggerConfig};
use crate::marker::{Marker, RootProvider};
use crate::object::Handle;
use crate::stats::{GcStats, GcTimer};
use indexmap::IndexMap;
use std::time::Duration;

/// GC cycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcState {
    /// Idle - no GC in progress
    Idle,
    /// Marking phase - identifying live objects
    Marking,
    /// Sweeping phase - releasing unmarked objects
    Sweeping,
}

impl std::fmt::Display for GcState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GcState::Idle => write!(f, "Idle"),
            GcState::Marking => write!(f, "Marking"),
            GcState::Sweeping => write!(f, "Sweeping"),
        }
    }
}

/// Why a collection was requested
///
/// Recorded in reports and logs only; it does not change the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcReason {
    /// Explicit GC request
    Explicit,
    /// An allocation of `requested` bytes failed
    AllocationFailure { requested: usize },
    /// Shutdown - final cleanup
    Shutdown,
}

impl std::fmt::Display for GcReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GcReason::Explicit => write!(f, "explicit"),
            GcReason::AllocationFailure { requested } => {
                write!(f, "allocation failure ({} bytes)", requested)
            },
            GcReason::Shutdown => write!(f, "shutdown"),
        }
    }
}

/// Outcome of one collection cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionReport {
    /// Cycle number, starting at 1
    pub cycle: u64,
    pub reason: GcReason,
    /// Handles reported by the root provider
    pub roots: usize,
    /// Objects reached during marking
    pub marked: usize,
    /// Objects still live after the sweep
    pub survivors: usize,
    pub reclaimed_objects: usize,
    pub reclaimed_bytes: usize,
    /// Stale handles skipped while marking
    pub stale_references: Vec<Handle>,
    /// Live bytes after the sweep
    pub live_bytes: usize,
    /// Wall time of the whole cycle
    pub pause: Duration,
}

impl std::fmt::Display for CollectionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GC #{} ({}): {} roots, {} marked, {} survivors, reclaimed {} objects / {} bytes, {} live bytes, {:.3}ms",
            self.cycle,
            self.reason,
            self.roots,
            self.marked,
            self.survivors,
            self.reclaimed_objects,
            self.reclaimed_bytes,
            self.live_bytes,
            self.pause.as_secs_f64() * 1000.0
        )?;
        if !self.stale_references.is_empty() {
            write!(f, ", {} stale references", self.stale_references.len())?;
        }
        Ok(())
    }
}

/// Collector - mark-and-sweep driver
///
/// Holds no reference to a heap; the heap and the roots are passed to each
/// [`collect`](Collector::collect) call, so one collector can serve any
/// heap and the borrow checker guarantees exclusive access for the cycle.
///
/// # Examples
///
/// ```rust
/// use bgc::{Collector, GcReason, Heap, Object, Tracer};
///
/// struct Leaf;
///
/// impl Object for Leaf {
///     fn repr(&self, _heap: &Heap) -> String {
///         "leaf".to_string()
///     }
///     fn equals_to(&self, _other: &dyn Object, _heap: &Heap) -> bool {
///         true
///     }
///     fn mark_children(&self, _tracer: &mut Tracer) {}
/// }
///
/// let mut heap = Heap::default();
/// let mut collector = Collector::default();
///
/// let kept = heap.allocate(Leaf)?;
/// let _dropped = heap.allocate(Leaf)?;
///
/// let report = collector.collect(&mut heap, &kept, GcReason::Explicit)?;
/// assert_eq!(report.reclaimed_objects, 1);
/// assert_eq!(heap.len(), 1);
/// # Ok::<(), bgc::BgcError>(())
/// ```
#[derive(Debug)]
pub struct Collector {
    config: GcConfig,
    marker: Marker,
    stats: GcStats,
    logger: GcLogger,
    state: GcState,
    cycle_count: u64,
}

impl Collector {
    /// Create new collector
    pub fn new(config: GcConfig) -> Self {
        Self {
            logger: GcLogger::new(GcLoggerConfig::from(&config)),
            config,
            marker: Marker::new(),
            stats: GcStats::new(),
            state: GcState::Idle,
            cycle_count: 0,
        }
    }

    /// Run one full collection cycle
    ///
    /// Every object not reachable from `roots` is released exactly once.
    ///
    /// # Errors
    /// `InvalidState` if the collector is not Idle, or (with
    /// `verify_invariants`) if objects are still marked before marking
    /// starts. Nothing is marked or released in that case.
    pub fn collect<R>(&mut self, heap: &mut Heap, roots: &R, reason: GcReason) -> Result<CollectionReport>
    where
        R: RootProvider + ?Sized,
    {
        self.check_idle(heap)?;

        self.cycle_count += 1;
        let cycle = self.cycle_count;
        let pause = GcTimer::new();
        let mut phase = GcTimer::new();

        self.logger.log(GcEvent::CycleStart {
            cycle,
            reason: reason.to_string(),
        });

        // Phase 1: mark
        self.state = GcState::Marking;
        let mark = self.marker.mark(heap, roots);
        for handle in &mark.stale {
            self.logger.log(GcEvent::StaleReference {
                cycle,
                handle: handle.to_string(),
            });
        }
        self.log_phase(cycle, "mark", phase.lap());

        // Phase 2: sweep
        self.state = GcState::Sweeping;
        let (survivors, reclaimed_objects, reclaimed_bytes) = Self::sweep(heap);
        self.log_phase(cycle, "sweep", phase.lap());

        self.state = GcState::Idle;
        let pause = pause.elapsed();
        debug_assert_eq!(heap.marked_count(), 0, "marks left after sweep");

        if self.config.stats_enabled {
            self.stats.record_collection(
                reclaimed_objects,
                reclaimed_bytes,
                mark.stale.len(),
                pause,
            );
        }

        self.logger.log(GcEvent::CycleEnd {
            cycle,
            duration_ms: pause.as_secs_f64() * 1000.0,
            survivors,
            reclaimed_objects,
            reclaimed_bytes,
        });

        Ok(CollectionReport {
            cycle,
            reason,
            roots: mark.roots,
            marked: mark.marked,
            survivors,
            reclaimed_objects,
            reclaimed_bytes,
            stale_references: mark.stale,
            live_bytes: heap.live_bytes(),
            pause,
        })
    }

    fn check_idle(&self, heap: &Heap) -> Result<()> {
        if self.state != GcState::Idle {
            return Err(BgcError::InvalidState {
                expected: GcState::Idle.to_string(),
                actual: self.state.to_string(),
            });
        }

        if self.config.verify_invariants {
            let marked = heap.marked_count();
            if marked > 0 {
                log::error!("{} objects marked before collection start", marked);
                return Err(BgcError::InvalidState {
                    expected: "no marked objects".to_string(),
                    actual: format!("{} marked objects", marked),
                });
            }
        }

        Ok(())
    }

    /// Release every unmarked object, clearing marks on the rest
    ///
    /// Returns (survivors, reclaimed objects, reclaimed bytes).
    fn sweep(heap: &mut Heap) -> (usize, usize, usize) {
        let snapshot: Vec<Handle> = heap.handles().collect();
        let mut survivors = 0;
        let mut reclaimed_objects = 0;
        let mut reclaimed_bytes = 0;

        for handle in snapshot {
            if heap.clear_mark(handle) {
                survivors += 1;
                continue;
            }
            match heap.release(handle) {
                Ok(bytes) => {
                    reclaimed_objects += 1;
                    reclaimed_bytes += bytes;
                },
                Err(err) => log::warn!("sweep could not release {}: {}", handle, err),
            }
        }

        (survivors, reclaimed_objects, reclaimed_bytes)
    }

    fn log_phase(&mut self, cycle: u64, phase: &str, duration: Duration) {
        self.logger.log(GcEvent::PhaseEnd {
            cycle,
            phase: phase.to_string(),
            duration_ms: duration.as_secs_f64() * 1000.0,
        });
    }

    /// Return to Idle after a cycle was abandoned midway
    ///
    /// A panicking `mark_children` or finalizer unwinds out of `collect`
    /// and leaves the collector in Marking or Sweeping with marks set.
    /// This clears every mark on `heap` and resets the state.
    pub fn reset(&mut self, heap: &mut Heap) {
        let handles: Vec<Handle> = heap.handles().collect();
        for handle in handles {
            heap.clear_mark(handle);
        }
        if self.state != GcState::Idle {
            log::warn!("collector reset from {} state", self.state);
        }
        self.state = GcState::Idle;
    }

    /// Current state; always Idle outside of `collect`
    pub fn state(&self) -> GcState {
        self.state
    }

    /// Number of cycles started
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn stats(&self) -> &GcStats {
        &self.stats
    }

    pub fn logger(&self) -> &GcLogger {
        &self.logger
    }

    pub fn config(&self) -> &GcConfig {
        &self.config
    }

    /// Detailed diagnostic information
    pub fn diagnostics(&self) -> IndexMap<String, String> {
        let mut diagnostics = IndexMap::new();
        let summary = self.stats.summary();

        diagnostics.insert("state".to_string(), self.state.to_string());
        diagnostics.insert("cycles".to_string(), self.cycle_count.to_string());
        diagnostics.insert(
            "objects_reclaimed".to_string(),
            summary.objects_reclaimed.to_string(),
        );
        diagnostics.insert(
            "bytes_reclaimed".to_string(),
            summary.bytes_reclaimed.to_string(),
        );
        diagnostics.insert(
            "stale_references".to_string(),
            summary.stale_references.to_string(),
        );
        diagnostics.insert(
            "last_pause_ms".to_string(),
            format!("{:.3}", summary.last_pause_ms),
        );
        diagnostics.insert(
            "max_pause_ms".to_string(),
            format!("{:.3}", summary.max_pause_ms),
        );
        diagnostics.insert(
            "avg_pause_ms".to_string(),
            format!("{:.3}", summary.avg_pause_ms),
        );
        diagnostics.insert(
            "recorded_events".to_string(),
            self.logger.event_count().to_string(),
        );

        diagnostics
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(GcConfig::default())
    }
}
