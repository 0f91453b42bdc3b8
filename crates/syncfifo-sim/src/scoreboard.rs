//! Reference model and protocol checker.
//!
//! The queue never reports illegal requests; verification catches them. The
//! scoreboard replays every tick against an independent `VecDeque` model,
//! checks grants, read data and occupancy, and records overflow/underflow
//! attempts as caller violations.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use syncfifo_core::prelude::{FullWritePolicy, QueueConfig, TickInput, TickOutput};

/// Plain bounded FIFO used as the golden model.
#[derive(Debug, Clone)]
pub struct ReferenceFifo {
    cap: usize,
    q: VecDeque<u64>,
}

impl ReferenceFifo {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            cap: cap.max(1),
            q: VecDeque::with_capacity(cap.max(1)),
        }
    }

    pub fn try_push(&mut self, v: u64) -> Result<(), u64> {
        if self.q.len() >= self.cap {
            Err(v)
        } else {
            self.q.push_back(v);
            Ok(())
        }
    }

    pub fn try_pop(&mut self) -> Option<u64> {
        self.q.pop_front()
    }

    pub fn clear(&mut self) {
        self.q.clear();
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }
    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }
    pub fn is_full(&self) -> bool {
        self.q.len() >= self.cap
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ViolationKind {
    /// Write requested while the queue could not accept it.
    Overflow,
    /// Read requested while the queue was empty.
    Underflow,
    /// The queue granted (or refused) differently from the model.
    Grant { expected_write: bool, expected_read: bool },
    Mismatch { expected: u64, actual: u64 },
    Occupancy { expected: usize, actual: usize },
    Expectation { field: String, expected: String, actual: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub tick: u64,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    /// Overflow/underflow attempts are caller bugs; everything else means
    /// the queue disagreed with the model.
    pub fn is_protocol(&self) -> bool {
        matches!(self.kind, ViolationKind::Overflow | ViolationKind::Underflow)
    }
}

#[derive(Debug, Clone)]
pub struct Scoreboard {
    model: ReferenceFifo,
    policy: FullWritePolicy,
    violations: Vec<Violation>,
}

impl Scoreboard {
    pub fn new(cfg: &QueueConfig) -> Self {
        Self {
            model: ReferenceFifo::with_capacity(cfg.depth),
            policy: cfg.full_write,
            violations: Vec::new(),
        }
    }

    pub fn observe(&mut self, tick: u64, input: &TickInput<u64>, out: &TickOutput<u64>) {
        if input.reset {
            self.model.clear();
            self.check_len(tick, out.len);
            return;
        }

        let exp_read = input.read && !self.model.is_empty();
        let exp_write = input.write
            && (!self.model.is_full()
                || (self.policy == FullWritePolicy::PassThrough && exp_read));

        if input.write && !exp_write {
            self.push(tick, ViolationKind::Overflow);
        }
        if input.read && !exp_read {
            self.push(tick, ViolationKind::Underflow);
        }
        if out.wrote != exp_write || out.read != exp_read {
            self.push(
                tick,
                ViolationKind::Grant {
                    expected_write: exp_write,
                    expected_read: exp_read,
                },
            );
        }

        // Pop before push so a pass-through write into a full model fits.
        if exp_read {
            if let Some(expected) = self.model.try_pop() {
                if expected != out.value {
                    self.push(
                        tick,
                        ViolationKind::Mismatch {
                            expected,
                            actual: out.value,
                        },
                    );
                }
            }
        }
        if exp_write && self.model.try_push(input.value).is_err() {
            self.push(
                tick,
                ViolationKind::Occupancy {
                    expected: self.model.len(),
                    actual: out.len,
                },
            );
        }
        self.check_len(tick, out.len);
    }

    fn check_len(&mut self, tick: u64, actual: usize) {
        let expected = self.model.len();
        if expected != actual {
            self.push(tick, ViolationKind::Occupancy { expected, actual });
        }
    }

    pub fn record(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    fn push(&mut self, tick: u64, kind: ViolationKind) {
        #[cfg(feature = "tracing")]
        tracing::debug!(tick, ?kind, "scoreboard violation");
        self.violations.push(Violation { tick, kind });
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    pub fn model(&self) -> &ReferenceFifo {
        &self.model
    }
}
