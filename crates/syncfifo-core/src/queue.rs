//! The bounded synchronous FIFO.
//!
//! `BoundedQueue::step` is the whole contract: one call per tick, computing
//! the next state from a snapshot of the current one and committing it in a
//! single pass. Illegal requests (write while full, read while empty) are
//! dropped without error; the grant flags in `TickOutput` and the counters
//! in `QueueStats` are how a caller notices.
//!
//! Occupancy `n` is the only source of `full`/`empty`. Pointer equality takes
//! part in exactly one decision: under `FullWritePolicy::PassThrough` a write
//! requested while full is admitted when the read pointer coincides with the
//! write pointer and a read is granted on the same tick, since that read
//! vacates the slot being refilled.

use serde::{Deserialize, Serialize};

use crate::config::{FullWritePolicy, QueueConfig};
use crate::error::{Error, Result};
use crate::stats::QueueStats;

/// Requests presented to the queue for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput<T> {
    pub reset: bool,
    pub write: bool,
    pub read: bool,
    /// Payload sampled when `write` is granted; ignored otherwise.
    pub value: T,
}

impl<T: Default> TickInput<T> {
    pub fn idle() -> Self {
        Self {
            reset: false,
            write: false,
            read: false,
            value: T::default(),
        }
    }

    pub fn reset() -> Self {
        Self {
            reset: true,
            ..Self::idle()
        }
    }

    pub fn write(value: T) -> Self {
        Self {
            write: true,
            value,
            ..Self::idle()
        }
    }

    pub fn read() -> Self {
        Self {
            read: true,
            ..Self::idle()
        }
    }

    pub fn write_read(value: T) -> Self {
        Self {
            write: true,
            read: true,
            value,
            ..Self::idle()
        }
    }
}

/// What the queue reports after a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutput<T> {
    /// Output register: the value most recently read out.
    pub value: T,
    pub full: bool,
    pub empty: bool,
    /// The write request was granted.
    pub wrote: bool,
    /// The read request was granted.
    pub read: bool,
    /// Occupancy after the tick.
    pub len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Normal,
    /// Set for the single tick on which reset was asserted.
    Reset,
}

/// Read-only view of the indices and occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueState {
    pub capacity: usize,
    pub write_index: usize,
    pub read_index: usize,
    pub len: usize,
    pub full: bool,
    pub empty: bool,
}

#[derive(Clone, Copy)]
struct Snapshot {
    w: usize,
    r: usize,
    n: usize,
}

#[derive(Debug, Clone)]
pub struct BoundedQueue<T> {
    slots: Box<[T]>,
    w: usize,
    r: usize,
    n: usize,
    output: T,
    policy: FullWritePolicy,
    mode: Mode,
    stats: QueueStats,
}

impl<T: Clone + Default> BoundedQueue<T> {
    /// Create an empty queue with `capacity` slots and the default policy.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(&QueueConfig::new(capacity))
    }

    pub fn with_config(cfg: &QueueConfig) -> Result<Self> {
        cfg.validate()
            .map_err(|e| e.with_context("constructing bounded queue"))?;
        let slots: Box<[T]> = std::iter::repeat_with(T::default)
            .take(cfg.depth)
            .collect();
        Ok(Self {
            slots,
            w: 0,
            r: 0,
            n: 0,
            output: T::default(),
            policy: cfg.full_write,
            mode: Mode::Normal,
            stats: QueueStats::new(),
        })
    }

    /// Advance the queue by one tick.
    pub fn step(&mut self, input: TickInput<T>) -> TickOutput<T> {
        let TickInput {
            reset,
            write,
            read,
            value,
        } = input;
        let cap = self.slots.len();
        let pre = Snapshot {
            w: self.w,
            r: self.r,
            n: self.n,
        };
        self.stats.ticks += 1;

        if reset {
            self.w = 0;
            self.r = 0;
            self.n = 0;
            self.mode = Mode::Reset;
            self.stats.resets += 1;
            #[cfg(feature = "tracing")]
            tracing::debug!(prev_len = pre.n, "fifo reset");
            return self.report(false, false);
        }
        self.mode = Mode::Normal;

        let full = pre.n == cap;
        let empty = pre.n == 0;
        let can_read = read && !empty;
        let can_write = write
            && match self.policy {
                FullWritePolicy::PassThrough => !full || (pre.r == pre.w && can_read),
                FullWritePolicy::Block => !full,
            };

        if write && !can_write {
            self.stats.overflow_attempts += 1;
            #[cfg(feature = "tracing")]
            tracing::debug!(len = pre.n, "write dropped: fifo full");
        }
        if read && !can_read {
            self.stats.underflow_attempts += 1;
            #[cfg(feature = "tracing")]
            tracing::debug!("read dropped: fifo empty");
        }

        // Read the old slot contents before the write commits; with the
        // pass-through policy both may address the same slot.
        if can_read {
            self.output = self.slots[pre.r].clone();
            self.r = (pre.r + 1) % cap;
            self.stats.reads += 1;
        }
        if can_write {
            self.slots[pre.w] = value;
            self.w = (pre.w + 1) % cap;
            self.stats.writes += 1;
        }
        self.n = match (can_write, can_read) {
            (true, false) => pre.n + 1,
            (false, true) => pre.n - 1,
            _ => pre.n,
        };
        if can_write && can_read {
            self.stats.simultaneous += 1;
        }
        self.stats.peak_occupancy = self.stats.peak_occupancy.max(self.n);

        debug_assert!(self.check_invariants().is_ok());
        #[cfg(feature = "tracing")]
        tracing::trace!(
            w = self.w,
            r = self.r,
            len = self.n,
            wrote = can_write,
            read = can_read,
            "fifo tick"
        );
        self.report(can_write, can_read)
    }

    /// Positional form of `step`.
    pub fn step_with(&mut self, reset: bool, write: bool, read: bool, value: T) -> TickOutput<T> {
        self.step(TickInput {
            reset,
            write,
            read,
            value,
        })
    }

    fn report(&self, wrote: bool, read: bool) -> TickOutput<T> {
        TickOutput {
            value: self.output.clone(),
            full: self.is_full(),
            empty: self.is_empty(),
            wrote,
            read,
            len: self.n,
        }
    }
}

impl<T> BoundedQueue<T> {
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn is_full(&self) -> bool {
        self.n == self.slots.len()
    }

    pub fn write_index(&self) -> usize {
        self.w
    }

    pub fn read_index(&self) -> usize {
        self.r
    }

    /// Current contents of the output register.
    pub fn output(&self) -> &T {
        &self.output
    }

    pub fn policy(&self) -> FullWritePolicy {
        self.policy
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }

    /// Raw slot contents in index order, stale slots included.
    pub fn slots(&self) -> &[T] {
        &self.slots
    }

    pub fn state(&self) -> QueueState {
        QueueState {
            capacity: self.capacity(),
            write_index: self.w,
            read_index: self.r,
            len: self.n,
            full: self.is_full(),
            empty: self.is_empty(),
        }
    }

    /// Check the index/occupancy invariants against each other.
    pub fn check_invariants(&self) -> Result<()> {
        let cap = self.slots.len();
        if self.n > cap {
            return Err(Error::Invariant(format!(
                "occupancy {} exceeds capacity {}",
                self.n, cap
            )));
        }
        if self.w >= cap || self.r >= cap {
            return Err(Error::Invariant(format!(
                "index out of range: w={} r={} capacity={}",
                self.w, self.r, cap
            )));
        }
        let derived = (self.w + cap - self.r) % cap;
        let expected = if self.n == cap { 0 } else { self.n };
        if derived != expected {
            return Err(Error::Invariant(format!(
                "occupancy {} disagrees with pointers w={} r={}",
                self.n, self.w, self.r
            )));
        }
        Ok(())
    }
}
