//! Stats Module - Collection statistics
//!
//! Cumulative numbers over every cycle a collector has run:
//! - Cycle count
//! - Objects and bytes reclaimed
//! - Pause time (last, max, total)

pub mod timer;

pub use timer::GcTimer;

use serde::Serialize;
use std::time::Duration;

/// GcStats - running totals across collections
#[derive(Debug, Default, Clone)]
pub struct GcStats {
    total_cycles: u64,
    objects_reclaimed: u64,
    bytes_reclaimed: u64,
    stale_references: u64,
    last_pause: Duration,
    max_pause: Duration,
    total_pause: Duration,
}

impl GcStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished collection
    pub fn record_collection(
        &mut self,
        objects_reclaimed: usize,
        bytes_reclaimed: usize,
        stale_references: usize,
        pause: Duration,
    ) {
        self.total_cycles += 1;
        self.objects_reclaimed += objects_reclaimed as u64;
        self.bytes_reclaimed += bytes_reclaimed as u64;
        self.stale_references += stale_references as u64;
        self.last_pause = pause;
        self.max_pause = self.max_pause.max(pause);
        self.total_pause += pause;
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    pub fn objects_reclaimed(&self) -> u64 {
        self.objects_reclaimed
    }

    pub fn bytes_reclaimed(&self) -> u64 {
        self.bytes_reclaimed
    }

    pub fn last_pause(&self) -> Duration {
        self.last_pause
    }

    pub fn max_pause(&self) -> Duration {
        self.max_pause
    }

    pub fn total_pause(&self) -> Duration {
        self.total_pause
    }

    /// Get summary statistics
    pub fn summary(&self) -> GcSummary {
        let avg_pause_ms = if self.total_cycles == 0 {
            0.0
        } else {
            self.total_pause.as_secs_f64() * 1000.0 / self.total_cycles as f64
        };

        GcSummary {
            total_cycles: self.total_cycles,
            objects_reclaimed: self.objects_reclaimed,
            bytes_reclaimed: self.bytes_reclaimed,
            stale_references: self.stale_references,
            last_pause_ms: self.last_pause.as_secs_f64() * 1000.0,
            max_pause_ms: self.max_pause.as_secs_f64() * 1000.0,
            avg_pause_ms,
        }
    }

    /// Reset statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Summary statistics
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct GcSummary {
    /// Total GC cycles
    pub total_cycles: u64,
    pub objects_reclaimed: u64,
    pub bytes_reclaimed: u64,
    /// Stale handles met while marking
    pub stale_references: u64,
    pub last_pause_ms: f64,
    /// Max pause time (ms)
    pub max_pause_ms: f64,
    /// Average pause time (ms)
    pub avg_pause_ms: f64,
}

impl std::fmt::Display for GcSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cycles: {}, reclaimed: {} objects / {} bytes, pause: last {:.3}ms max {:.3}ms avg {:.3}ms",
            self.total_cycles,
            self.objects_reclaimed,
            self.bytes_reclaimed,
            self.last_pause_ms,
            self.max_pause_ms,
            self.avg_pause_ms
        )
    }
}
