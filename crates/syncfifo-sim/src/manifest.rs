//! Run manifest: what was run, what happened, and a stable trace digest.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use syncfifo_core::prelude::{QueueConfig, QueueStats};

use crate::trace::TraceRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    pub config: QueueConfig,
    pub ticks: u64,
    pub stats: QueueStats,
    pub violations: usize,
    /// blake3 over every trace record, hex encoded.
    pub trace_digest: String,
    pub started_ms: u64,
    pub finished_ms: u64,
}

impl RunManifest {
    pub fn start(config: QueueConfig, started_ms: u64) -> Self {
        Self {
            config,
            ticks: 0,
            stats: QueueStats::default(),
            violations: 0,
            trace_digest: String::new(),
            started_ms,
            finished_ms: started_ms,
        }
    }

    pub fn finish(
        mut self,
        finished_ms: u64,
        stats: QueueStats,
        violations: usize,
        digest: &TraceDigest,
    ) -> Self {
        self.ticks = digest.records();
        self.stats = stats;
        self.violations = violations;
        self.trace_digest = digest.finalize();
        self.finished_ms = finished_ms.max(self.started_ms);
        self
    }
}

/// Incremental blake3 digest of a trace, fed one record per tick so runs
/// that do not keep their trace still get a digest.
#[derive(Debug, Clone, Default)]
pub struct TraceDigest {
    hasher: blake3::Hasher,
    records: u64,
}

impl TraceDigest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, rec: &TraceRecord) {
        let flags = (rec.reset as u8)
            | (rec.write_request as u8) << 1
            | (rec.read_request as u8) << 2
            | (rec.wrote as u8) << 3
            | (rec.read as u8) << 4
            | (rec.full as u8) << 5
            | (rec.empty as u8) << 6;
        self.hasher.update(&rec.tick.to_le_bytes());
        self.hasher.update(&[flags]);
        self.hasher.update(&rec.input.to_le_bytes());
        self.hasher.update(&rec.output.to_le_bytes());
        self.hasher.update(&(rec.len as u64).to_le_bytes());
        self.records += 1;
    }

    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn finalize(&self) -> String {
        self.hasher.finalize().to_hex().to_string()
    }
}

/// Deterministic digest of a trace; identical runs hash identically.
pub fn trace_digest(trace: &[TraceRecord]) -> String {
    let mut digest = TraceDigest::new();
    for rec in trace {
        digest.update(rec);
    }
    digest.finalize()
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
