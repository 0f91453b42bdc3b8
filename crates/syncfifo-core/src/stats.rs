//! Per-queue activity counters.
//!
//! Overflow and underflow attempts are never errors at the queue boundary;
//! these counters are how a caller observes them after the fact.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Ticks stepped, reset ticks included.
    pub ticks: u64,
    pub resets: u64,
    /// Granted writes.
    pub writes: u64,
    /// Granted reads.
    pub reads: u64,
    /// Ticks where a write and a read were both granted.
    pub simultaneous: u64,
    /// Write requests dropped because the queue was full.
    pub overflow_attempts: u64,
    /// Read requests dropped because the queue was empty.
    pub underflow_attempts: u64,
    /// Highest occupancy observed after any tick.
    pub peak_occupancy: usize,
}

impl QueueStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge counters from another queue or run into a new value.
    pub fn merge(&self, other: &QueueStats) -> QueueStats {
        QueueStats {
            ticks: self.ticks + other.ticks,
            resets: self.resets + other.resets,
            writes: self.writes + other.writes,
            reads: self.reads + other.reads,
            simultaneous: self.simultaneous + other.simultaneous,
            overflow_attempts: self.overflow_attempts + other.overflow_attempts,
            underflow_attempts: self.underflow_attempts + other.underflow_attempts,
            peak_occupancy: self.peak_occupancy.max(other.peak_occupancy),
        }
    }

    pub fn reset_counters(&mut self) {
        *self = QueueStats::default();
    }

    /// Requests the queue silently ignored.
    pub fn dropped(&self) -> u64 {
        self.overflow_attempts + self.underflow_attempts
    }
}
