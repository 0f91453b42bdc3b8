pub use crate::config::{FullWritePolicy, QueueConfig};
pub use crate::error::{Error, Result};
pub use crate::queue::{BoundedQueue, Mode, QueueState, TickInput, TickOutput};
pub use crate::stats::QueueStats;
