//! Queue configuration: depth, payload width, and the full-write policy.
//!
//! `QueueConfig` is plain data (serde) so it can be embedded in driver scripts
//! or loaded from the environment. Validation is explicit via `validate()`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_DEPTH: usize = 16;
pub const DEFAULT_DATA_WIDTH: u32 = 32;
pub const MAX_DATA_WIDTH: u32 = 64;

/// What happens to a write requested while the queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FullWritePolicy {
    /// Admit the write when a read on the same tick frees the slot at the
    /// (coinciding) read/write pointers.
    #[default]
    PassThrough,
    /// Never write while full.
    Block,
}

impl FromStr for FullWritePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pass_through" | "pass-through" | "passthrough" => Ok(FullWritePolicy::PassThrough),
            "block" => Ok(FullWritePolicy::Block),
            other => Err(Error::Config(format!("unknown full-write policy '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Number of slots (capacity `C`).
    pub depth: usize,
    /// Payload width in bits; drivers mask input words to this width.
    pub data_width: u32,
    pub full_write: FullWritePolicy,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            data_width: DEFAULT_DATA_WIDTH,
            full_write: FullWritePolicy::default(),
        }
    }
}

impl QueueConfig {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    /// Build a config from `SYNCFIFO_*` environment variables.
    ///
    /// Absent or unparseable values fall back to the defaults; call
    /// `validate()` afterwards to reject out-of-range values.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(depth) = env_parse::<usize>("SYNCFIFO_DEPTH") {
            cfg.depth = depth;
        }
        if let Some(width) = env_parse::<u32>("SYNCFIFO_DATA_WIDTH") {
            cfg.data_width = width;
        }
        if let Some(policy) = env_parse::<FullWritePolicy>("SYNCFIFO_FULL_WRITE") {
            cfg.full_write = policy;
        }
        cfg
    }

    pub fn from_json(src: &str) -> Result<Self> {
        let cfg: QueueConfig = serde_json::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(Error::Config("depth must be at least 1".into()));
        }
        if self.data_width == 0 || self.data_width > MAX_DATA_WIDTH {
            return Err(Error::Config(format!(
                "data width {} out of range 1..={}",
                self.data_width, MAX_DATA_WIDTH
            )));
        }
        Ok(())
    }

    /// Bit mask selecting the low `data_width` bits of a word.
    pub fn word_mask(&self) -> u64 {
        if self.data_width >= MAX_DATA_WIDTH {
            u64::MAX
        } else {
            (1u64 << self.data_width) - 1
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
