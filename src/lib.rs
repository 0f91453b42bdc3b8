#![forbid(unsafe_code)]
//! syncfifo: a tick-accurate bounded synchronous FIFO and its verification driver.
//!
//! Re-exports the workspace crates:
//! - `syncfifo_core`: the queue, config, and stats.
//! - `syncfifo_sim`: request merging, scoreboard, scripts, traces.

pub use syncfifo_core;
pub use syncfifo_sim;

pub use syncfifo_core::{BoundedQueue, FullWritePolicy, QueueConfig, TickInput, TickOutput};
pub use syncfifo_sim::{Driver, Request, Script};
