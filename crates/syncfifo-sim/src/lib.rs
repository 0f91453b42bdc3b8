#![forbid(unsafe_code)]
//! syncfifo-sim: drives a `BoundedQueue` tick by tick.
//!
//! - `request`: per-actor requests and their merge into one tick input.
//! - `driver`: clock owner; steps the queue, checks, and traces.
//! - `scoreboard`: golden `VecDeque` model and violation reporting.
//! - `script`: YAML tick scripts with expectations.
//! - `trace`: per-tick records, CSV/NDJSON writers.
//! - `manifest`: run summary with a blake3 trace digest.

pub mod driver;
pub mod error;
pub mod manifest;
pub mod request;
pub mod scoreboard;
pub mod script;
pub mod trace;

pub use driver::{Driver, RunReport};
pub use request::{merge_requests, Request};
pub use script::{load_script, parse_script, validate_script, ConfigOverrides, Script};
