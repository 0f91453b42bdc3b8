//! Per-tick trace records and their writers (CSV, NDJSON).

use std::fs::File;
use std::io::Write;

use csv as csv_crate;
use serde::{Deserialize, Serialize};

use syncfifo_core::prelude::{TickInput, TickOutput};

use crate::error::Result;

/// One row of the waveform: requests in, grants and status out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub tick: u64,
    pub reset: bool,
    pub write_request: bool,
    pub read_request: bool,
    pub input: u64,
    pub wrote: bool,
    pub read: bool,
    pub output: u64,
    pub full: bool,
    pub empty: bool,
    pub len: usize,
}

impl TraceRecord {
    pub fn new(tick: u64, input: &TickInput<u64>, out: &TickOutput<u64>) -> Self {
        Self {
            tick,
            reset: input.reset,
            write_request: input.write,
            read_request: input.read,
            input: input.value,
            wrote: out.wrote,
            read: out.read,
            output: out.value,
            full: out.full,
            empty: out.empty,
            len: out.len,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceFormat {
    Csv,
    Jsonl,
}

impl std::str::FromStr for TraceFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(TraceFormat::Csv),
            "jsonl" | "ndjson" => Ok(TraceFormat::Jsonl),
            other => Err(format!("unknown trace format '{}'", other)),
        }
    }
}

pub struct CsvTraceWriter<W: Write> {
    wtr: csv_crate::Writer<W>,
}

impl CsvTraceWriter<File> {
    pub fn to_path(path: &str) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::to_writer(file))
    }
}

impl<W: Write> CsvTraceWriter<W> {
    /// Headers come from the `TraceRecord` field names on the first record.
    pub fn to_writer(writer: W) -> Self {
        Self {
            wtr: csv_crate::Writer::from_writer(writer),
        }
    }

    pub fn write_records(&mut self, records: &[TraceRecord]) -> Result<()> {
        for rec in records {
            self.wtr.serialize(rec)?;
        }
        self.wtr.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.wtr
            .into_inner()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()).into())
    }
}

pub struct JsonlTraceWriter<W: Write> {
    out: W,
}

impl JsonlTraceWriter<File> {
    pub fn to_path(path: &str) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::to_writer(file))
    }
}

impl<W: Write> JsonlTraceWriter<W> {
    pub fn to_writer(writer: W) -> Self {
        Self { out: writer }
    }

    pub fn write_records(&mut self, records: &[TraceRecord]) -> Result<()> {
        for rec in records {
            serde_json::to_writer(&mut self.out, rec)?;
            self.out.write_all(b"\n")?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Write `records` to `path` in the given format.
pub fn write_trace(path: &str, format: TraceFormat, records: &[TraceRecord]) -> Result<()> {
    match format {
        TraceFormat::Csv => CsvTraceWriter::to_path(path)?.write_records(records),
        TraceFormat::Jsonl => JsonlTraceWriter::to_path(path)?.write_records(records),
    }
}
