//! YAML tick scripts.
//!
//! Example:
//! ```yaml
//! config: { depth: 4, data_width: 8 }
//! ticks:
//!   - write: 10
//!   - write: 20
//!   - read: true
//!     expect: { output: 10, len: 1 }
//!   - { write: 30, read: true, expect: { output: 20 } }
//!   - actors: [ { read: true }, { write: 40 } ]
//!   - repeat: 3            # three idle ticks
//!   - reset: true
//!     expect: { empty: true }
//! ```
//!
//! `write`/`read`/`reset` describe a single actor; `actors` lists requests
//! from several actors that the driver merges. Both forms may be combined on
//! one entry. `expect` is checked after the last repetition of its entry.
//! Repeats are never materialized; `expand` yields ticks lazily.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use syncfifo_core::prelude::{FullWritePolicy, QueueConfig};

use crate::error::{Error, Result};
use crate::request::Request;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub config: Option<QueueConfig>,
    pub ticks: Vec<TickSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TickSpec {
    pub reset: bool,
    pub write: Option<u64>,
    pub read: bool,
    pub actors: Vec<ActorSpec>,
    /// Number of times to issue this entry (default 1).
    pub repeat: Option<u32>,
    pub expect: Option<Expect>,
}

impl TickSpec {
    pub fn requests(&self) -> Vec<Request> {
        let mut reqs = Vec::with_capacity(self.actors.len() + 3);
        if self.reset {
            reqs.push(Request::Reset);
        }
        if let Some(v) = self.write {
            reqs.push(Request::Write(v));
        }
        if self.read {
            reqs.push(Request::Read);
        }
        for actor in &self.actors {
            reqs.extend(actor.requests());
        }
        reqs
    }

    pub fn repeat_count(&self) -> u32 {
        self.repeat.unwrap_or(1)
    }
}

/// Requests from one additional actor on the same tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActorSpec {
    pub reset: bool,
    pub write: Option<u64>,
    pub read: bool,
}

impl ActorSpec {
    pub fn requests(&self) -> impl Iterator<Item = Request> {
        let reset = self.reset.then_some(Request::Reset);
        let write = self.write.map(Request::Write);
        let read = self.read.then_some(Request::Read);
        reset.into_iter().chain(write).chain(read)
    }
}

/// Post-tick assertions; unset fields are not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Expect {
    pub output: Option<u64>,
    pub full: Option<bool>,
    pub empty: Option<bool>,
    pub len: Option<usize>,
}

/// One concrete tick after `repeat` expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedTick {
    pub requests: Vec<Request>,
    pub expect: Option<Expect>,
}

impl Script {
    /// The script's config, or `base` when it has none.
    pub fn resolved_config(&self, base: &QueueConfig) -> QueueConfig {
        self.config.clone().unwrap_or_else(|| base.clone())
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks.iter().map(|t| t.repeat_count() as u64).sum()
    }

    pub fn expand(&self) -> impl Iterator<Item = ExpandedTick> + '_ {
        self.ticks.iter().flat_map(|spec| {
            let n = spec.repeat_count();
            (0..n).map(move |i| ExpandedTick {
                requests: spec.requests(),
                expect: if i + 1 == n { spec.expect.clone() } else { None },
            })
        })
    }

    /// One line per entry, repeats folded as `xN`.
    pub fn summary_lines(&self) -> Vec<String> {
        self.ticks
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let reqs: Vec<String> = spec.requests().iter().map(|r| format!("{:?}", r)).collect();
                let mut line = if reqs.is_empty() {
                    "idle".to_string()
                } else {
                    reqs.join(" + ")
                };
                if spec.repeat_count() > 1 {
                    line.push_str(&format!(" x{}", spec.repeat_count()));
                }
                if let Some(e) = &spec.expect {
                    line.push_str(&format!("  expect {:?}", e));
                }
                format!("{}. {}", i + 1, line)
            })
            .collect()
    }
}

/// Command-line overrides layered on top of a script's config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub depth: Option<usize>,
    pub data_width: Option<u32>,
    pub block_full_writes: bool,
}

impl ConfigOverrides {
    /// Resolve in order: `base` (usually the environment), then the script's
    /// `config` block, then these overrides.
    pub fn resolve(&self, script: &Script, base: &QueueConfig) -> QueueConfig {
        let mut cfg = script.resolved_config(base);
        if let Some(depth) = self.depth {
            cfg.depth = depth;
        }
        if let Some(width) = self.data_width {
            cfg.data_width = width;
        }
        if self.block_full_writes {
            cfg.full_write = FullWritePolicy::Block;
        }
        cfg
    }

    /// Resolve and pin the result into `script.config`, so a driver running
    /// the script cannot fall back to the script's own block.
    pub fn apply(&self, script: &mut Script, base: &QueueConfig) -> QueueConfig {
        let cfg = self.resolve(script, base);
        script.config = Some(cfg.clone());
        cfg
    }
}

pub fn parse_script(yaml_src: &str) -> Result<Script> {
    let script: Script = serde_yaml::from_str(yaml_src)?;
    Ok(script)
}

pub fn load_script(path: &Path) -> Result<Script> {
    let src = fs::read_to_string(path)?;
    parse_script(&src).map_err(|e| e.with_context(path.display().to_string()))
}

/// Check a parsed script against the config it will run under.
pub fn validate_script(script: &Script, cfg: &QueueConfig) -> Result<()> {
    cfg.validate()?;
    let mask = cfg.word_mask();
    for (idx, spec) in script.ticks.iter().enumerate() {
        if spec.repeat == Some(0) {
            return Err(Error::Script(format!("entry {}: repeat must be at least 1", idx)));
        }
        for req in spec.requests() {
            if let Request::Write(v) = req {
                if v & !mask != 0 {
                    return Err(Error::Script(format!(
                        "entry {}: value {:#x} does not fit in {} bits",
                        idx, v, cfg.data_width
                    )));
                }
            }
        }
        if let Some(out) = spec.expect.as_ref().and_then(|e| e.output) {
            if out & !mask != 0 {
                return Err(Error::Script(format!(
                    "entry {}: expected output {:#x} does not fit in {} bits",
                    idx, out, cfg.data_width
                )));
            }
        }
        if let Some(len) = spec.expect.as_ref().and_then(|e| e.len) {
            if len > cfg.depth {
                return Err(Error::Script(format!(
                    "entry {}: expected len {} exceeds depth {}",
                    idx, len, cfg.depth
                )));
            }
        }
    }
    Ok(())
}
