//! Tick driver: owns the clock for one queue.
//!
//! Each tick the driver merges actor requests, masks the payload to the
//! configured width, steps the queue, replays the tick on the scoreboard,
//! and feeds the trace digest. Trace records are kept in memory unless
//! retention is switched off, which long runs should do.

use syncfifo_core::prelude::{BoundedQueue, QueueConfig, TickInput, TickOutput};

use crate::error::{Error, Result};
use crate::manifest::{now_millis, RunManifest, TraceDigest};
use crate::request::{merge_requests, Request};
use crate::scoreboard::{Scoreboard, Violation, ViolationKind};
use crate::script::{validate_script, Expect, Script};
use crate::trace::TraceRecord;

pub struct Driver {
    cfg: QueueConfig,
    queue: BoundedQueue<u64>,
    scoreboard: Scoreboard,
    trace: Vec<TraceRecord>,
    digest: TraceDigest,
    tick: u64,
    collect: bool,
    retain_trace: bool,
}

/// Outcome of a complete run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub manifest: RunManifest,
    pub trace: Vec<TraceRecord>,
    pub violations: Vec<Violation>,
}

impl RunReport {
    /// Values produced by granted reads, in order (retained trace only).
    pub fn reads(&self) -> Vec<u64> {
        self.trace.iter().filter(|r| r.read).map(|r| r.output).collect()
    }

    /// Violations where the queue disagreed with the model or an expectation.
    pub fn failures(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| !v.is_protocol())
    }

    /// Overflow/underflow attempts made by the script.
    pub fn protocol_violations(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.is_protocol())
    }

    pub fn passed(&self, strict: bool) -> bool {
        if strict {
            self.violations.is_empty()
        } else {
            self.failures().next().is_none()
        }
    }
}

impl Driver {
    pub fn new(cfg: QueueConfig) -> Result<Self> {
        let queue = BoundedQueue::with_config(&cfg)?;
        let scoreboard = Scoreboard::new(&cfg);
        Ok(Self {
            cfg,
            queue,
            scoreboard,
            trace: Vec::new(),
            digest: TraceDigest::new(),
            tick: 0,
            collect: false,
            retain_trace: true,
        })
    }

    /// Keep per-tick records for the report (default on). The digest and
    /// counters are maintained either way.
    pub fn retain_trace(mut self, on: bool) -> Self {
        self.retain_trace = on;
        self
    }

    /// Rebuild the queue and scoreboard for `cfg`; only before the first tick.
    pub fn reconfigure(&mut self, cfg: QueueConfig) -> Result<()> {
        if self.tick > 0 {
            return Err(Error::Script(format!(
                "cannot reconfigure after {} ticks",
                self.tick
            )));
        }
        self.queue = BoundedQueue::with_config(&cfg)?;
        self.scoreboard = Scoreboard::new(&cfg);
        self.cfg = cfg;
        Ok(())
    }

    /// Record failed expectations as violations instead of stopping.
    pub fn collect_failures(mut self, on: bool) -> Self {
        self.collect = on;
        self
    }

    /// Merge `requests` from all actors and advance one tick.
    pub fn tick(&mut self, requests: &[Request]) -> Result<TickOutput<u64>> {
        let input = merge_requests(self.tick + 1, requests)?;
        Ok(self.step(input))
    }

    /// Advance one tick with an already-merged input.
    pub fn step(&mut self, mut input: TickInput<u64>) -> TickOutput<u64> {
        self.tick += 1;
        input.value &= self.cfg.word_mask();
        let out = self.queue.step(input.clone());
        self.scoreboard.observe(self.tick, &input, &out);
        let rec = TraceRecord::new(self.tick, &input, &out);
        self.digest.update(&rec);
        if self.retain_trace {
            self.trace.push(rec);
        }
        out
    }

    /// Compare `out` against `expect`; the first mismatching field fails.
    pub fn check_expect(&mut self, expect: &Expect, out: &TickOutput<u64>) -> Result<()> {
        let checks = [
            ("output", expect.output.map(|v| v.to_string()), out.value.to_string()),
            ("full", expect.full.map(|v| v.to_string()), out.full.to_string()),
            ("empty", expect.empty.map(|v| v.to_string()), out.empty.to_string()),
            ("len", expect.len.map(|v| v.to_string()), out.len.to_string()),
        ];
        for (field, expected, actual) in checks {
            let Some(expected) = expected else { continue };
            if expected == actual {
                continue;
            }
            if self.collect {
                self.scoreboard.record(Violation {
                    tick: self.tick,
                    kind: ViolationKind::Expectation {
                        field: field.to_string(),
                        expected,
                        actual,
                    },
                });
            } else {
                return Err(Error::Expectation {
                    tick: self.tick,
                    field,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Validate and run every tick of `script`, consuming the driver.
    ///
    /// A `config` block in the script replaces the driver's config.
    pub fn run_script(mut self, script: &Script) -> Result<RunReport> {
        let cfg = script.resolved_config(&self.cfg);
        if cfg != self.cfg {
            self.reconfigure(cfg)?;
        }
        validate_script(script, &self.cfg)?;
        let started = now_millis();
        #[cfg(feature = "tracing")]
        tracing::info!(depth = self.cfg.depth, ticks = script.tick_count(), "running script");

        for spec in &script.ticks {
            let requests = spec.requests();
            let n = spec.repeat_count();
            for i in 0..n {
                let out = self.tick(&requests)?;
                if i + 1 == n {
                    if let Some(expect) = &spec.expect {
                        self.check_expect(expect, &out)?;
                    }
                }
            }
        }
        self.finish(started)
    }

    pub fn finish(self, started_ms: u64) -> Result<RunReport> {
        let stats = self.queue.stats().clone();
        let violations = self.scoreboard.into_violations();
        let manifest = RunManifest::start(self.cfg, started_ms).finish(
            now_millis(),
            stats,
            violations.len(),
            &self.digest,
        );
        #[cfg(feature = "tracing")]
        tracing::info!(
            ticks = manifest.ticks,
            violations = manifest.violations,
            digest = %manifest.trace_digest,
            "run finished"
        );
        Ok(RunReport {
            manifest,
            trace: self.trace,
            violations,
        })
    }

    pub fn config(&self) -> &QueueConfig {
        &self.cfg
    }

    pub fn queue(&self) -> &BoundedQueue<u64> {
        &self.queue
    }

    pub fn trace(&self) -> &[TraceRecord] {
        &self.trace
    }

    pub fn violations(&self) -> &[Violation] {
        self.scoreboard.violations()
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }
}
