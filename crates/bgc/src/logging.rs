//! GC Logging and Tracing
//!
//! Collection events are recorded in a bounded in-memory history and
//! emitted through the `log` facade. The crate never installs a logger;
//! the embedding interpreter picks one.
//!
//! Log Levels:
//! - WARN: Stale references reached while marking
//! - INFO: Cycle start/end (verbose mode)
//! - DEBUG: Cycle start/end, phases (verbose mode)
//! - TRACE: Phases

use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::VecDeque;

/// GC event types
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GcEvent {
    /// GC cycle started
    CycleStart { cycle: u64, reason: String },

    /// GC phase completed
    PhaseEnd {
        cycle: u64,
        phase: String,
        duration_ms: f64,
    },

    /// GC cycle completed
    CycleEnd {
        cycle: u64,
        duration_ms: f64,
        survivors: usize,
        reclaimed_objects: usize,
        reclaimed_bytes: usize,
    },

    /// Marking reached a handle that no longer names a live object
    StaleReference { cycle: u64, handle: String },
}

impl GcEvent {
    /// Cycle the event belongs to
    pub fn cycle(&self) -> u64 {
        match self {
            GcEvent::CycleStart { cycle, .. }
            | GcEvent::PhaseEnd { cycle, .. }
            | GcEvent::CycleEnd { cycle, .. }
            | GcEvent::StaleReference { cycle, .. } => *cycle,
        }
    }
}

impl std::fmt::Display for GcEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GcEvent::CycleStart { cycle, reason } => {
                write!(f, "[GC] Cycle {} started (reason: {})", cycle, reason)
            },
            GcEvent::PhaseEnd {
                cycle,
                phase,
                duration_ms,
            } => write!(
                f,
                "[GC] Cycle {}: {} phase completed ({:.3}ms)",
                cycle, phase, duration_ms
            ),
            GcEvent::CycleEnd {
                cycle,
                duration_ms,
                survivors,
                reclaimed_objects,
                reclaimed_bytes,
            } => write!(
                f,
                "[GC] Cycle {} completed ({:.3}ms, {} survivors, reclaimed {} objects / {} bytes)",
                cycle, duration_ms, survivors, reclaimed_objects, reclaimed_bytes
            ),
            GcEvent::StaleReference { cycle, handle } => {
                write!(f, "[GC] Cycle {}: stale reference {} skipped", cycle, handle)
            },
        }
    }
}

/// GC Logger configuration
#[derive(Debug, Clone)]
pub struct GcLoggerConfig {
    /// Raise cycle events to info
    pub verbose: bool,

    /// Render events as JSON
    pub json: bool,

    /// Events retained in memory
    pub history: usize,
}

impl Default for GcLoggerConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            json: false,
            history: 256,
        }
    }
}

impl From<&crate::config::GcConfig> for GcLoggerConfig {
    fn from(config: &crate::config::GcConfig) -> Self {
        Self {
            verbose: config.verbose,
            json: config.json_events,
            history: config.event_history,
        }
    }
}

/// GC Logger - records and emits collection events
#[derive(Debug)]
pub struct GcLogger {
    config: GcLoggerConfig,
    events: VecDeque<(DateTime<Local>, GcEvent)>,
}

impl GcLogger {
    /// Create new GC logger
    pub fn new(config: GcLoggerConfig) -> Self {
        Self {
            events: VecDeque::with_capacity(config.history.min(1024)),
            config,
        }
    }

    /// Log a GC event
    pub fn log(&mut self, event: GcEvent) {
        let level = self.event_level(&event);
        if log::log_enabled!(target: "bgc::gc", level) {
            if self.config.json {
                match serde_json::to_string(&event) {
                    Ok(json) => log::log!(target: "bgc::gc", level, "{}", json),
                    Err(err) => log::warn!("failed to render GC event as JSON: {}", err),
                }
            } else {
                log::log!(target: "bgc::gc", level, "{}", event);
            }
        }

        if self.config.history == 0 {
            return;
        }
        while self.events.len() >= self.config.history {
            self.events.pop_front();
        }
        self.events.push_back((Local::now(), event));
    }

    fn event_level(&self, event: &GcEvent) -> log::Level {
        match event {
            GcEvent::StaleReference { .. } => log::Level::Warn,
            GcEvent::CycleStart { .. } | GcEvent::CycleEnd { .. } => {
                if self.config.verbose {
                    log::Level::Info
                } else {
                    log::Level::Debug
                }
            },
            GcEvent::PhaseEnd { .. } => {
                if self.config.verbose {
                    log::Level::Debug
                } else {
                    log::Level::Trace
                }
            },
        }
    }

    /// Recorded events, oldest first
    pub fn events(&self) -> impl Iterator<Item = &(DateTime<Local>, GcEvent)> + '_ {
        self.events.iter()
    }

    /// Most recent event
    pub fn last_event(&self) -> Option<&GcEvent> {
        self.events.back().map(|(_, event)| event)
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Render the history as one JSON array
    pub fn export_json(&self) -> serde_json::Result<String> {
        let entries: Vec<serde_json::Value> = self
            .events
            .iter()
            .map(|(timestamp, event)| {
                serde_json::json!({
                    "timestamp": timestamp.to_rfc3339(),
                    "event": event,
                })
            })
            .collect();
        serde_json::to_string(&entries)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for GcLogger {
    fn default() -> Self {
        Self::new(GcLoggerConfig::default())
    }
}
