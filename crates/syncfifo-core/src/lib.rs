#![forbid(unsafe_code)]
//! syncfifo-core: the bounded synchronous FIFO model.
//!
//! This crate contains the queue itself plus its configuration and
//! statistics types. There is **no I/O** and **no threading** here; a
//! driver (see `syncfifo-sim`) owns the clock and calls `step` once per tick.
//!
//! Modules:
//! - `queue`: `BoundedQueue`, tick inputs/outputs, state snapshots.
//! - `config`: `QueueConfig` (depth, payload width, full-write policy).
//! - `stats`: `QueueStats` counters, including dropped requests.
//! - `error`: crate error type.

pub mod config;
pub mod error;
pub mod prelude;
pub mod queue;
pub mod stats;

pub use config::{FullWritePolicy, QueueConfig};
pub use queue::{BoundedQueue, Mode, QueueState, TickInput, TickOutput};
pub use stats::QueueStats;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
