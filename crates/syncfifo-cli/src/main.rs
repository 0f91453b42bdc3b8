//! syncfifo CLI: run, validate and explain tick scripts.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use syncfifo_core::prelude::QueueConfig;
use syncfifo_sim::trace::{write_trace, TraceFormat};
use syncfifo_sim::{load_script, validate_script, ConfigOverrides, Driver};

#[derive(Parser)]
#[command(name = "syncfifo")]
#[command(about = "Tick-accurate model of a bounded synchronous FIFO", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a tick script and check it against the reference model
    Run {
        /// Path to the script YAML file
        #[arg(short, long)]
        script: PathBuf,

        /// Queue depth (overrides script and environment)
        #[arg(long)]
        depth: Option<usize>,

        /// Payload width in bits (overrides script and environment)
        #[arg(long)]
        data_width: Option<u32>,

        /// Refuse writes while full even when a read frees the slot
        #[arg(long)]
        block_full_writes: bool,

        /// Write the per-tick trace to this file
        #[arg(long)]
        trace: Option<PathBuf>,

        /// Trace format: csv or jsonl
        #[arg(long, default_value = "csv")]
        format: TraceFormat,

        /// Keep going after a failed expectation and report all of them
        #[arg(long)]
        collect: bool,

        /// Treat overflow/underflow attempts as failures
        #[arg(long)]
        strict: bool,
    },

    /// Validate a script (syntax and value ranges)
    Validate {
        /// Path to the script YAML file
        #[arg(short, long)]
        script: PathBuf,
    },

    /// Show the resolved config and expanded tick list
    Explain {
        /// Path to the script YAML file
        #[arg(short, long)]
        script: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            script,
            depth,
            data_width,
            block_full_writes,
            trace,
            format,
            collect,
            strict,
        } => {
            let overrides = ConfigOverrides {
                depth,
                data_width,
                block_full_writes,
            };
            match run_script(&script, &overrides, trace, format, collect, strict) {
                Ok(true) => {}
                Ok(false) => std::process::exit(1),
                Err(e) => {
                    report_error("Error", &e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Validate { script } => {
            if let Err(e) = validate(&script) {
                report_error("Validation failed", &e);
                std::process::exit(1);
            }
            println!("✓ Script is valid");
        }
        Commands::Explain { script } => {
            if let Err(e) = explain(&script) {
                report_error("Error", &e);
                std::process::exit(1);
            }
        }
    }
}

fn report_error(prefix: &str, e: &syncfifo_sim::error::Error) {
    eprintln!("{}: {}", prefix, e);
    let suggestions = e.suggestions();
    if !suggestions.is_empty() {
        eprintln!("Suggestions:");
        for s in suggestions {
            eprintln!("  - {}", s);
        }
    }
}

fn run_script(
    path: &PathBuf,
    overrides: &ConfigOverrides,
    trace: Option<PathBuf>,
    format: TraceFormat,
    collect: bool,
    strict: bool,
) -> syncfifo_sim::error::Result<bool> {
    let mut script = load_script(path)?;
    let cfg = overrides.apply(&mut script, &QueueConfig::from_env());
    let report = Driver::new(cfg)?
        .collect_failures(collect)
        .retain_trace(trace.is_some())
        .run_script(&script)?;

    if let Some(out) = trace {
        write_trace(&out.to_string_lossy(), format, &report.trace)?;
    }

    let m = &report.manifest;
    println!("Ticks: {}", m.ticks);
    println!(
        "  Writes: {}  Reads: {}  Simultaneous: {}  Resets: {}",
        m.stats.writes, m.stats.reads, m.stats.simultaneous, m.stats.resets
    );
    println!(
        "  Dropped: {} overflow, {} underflow",
        m.stats.overflow_attempts, m.stats.underflow_attempts
    );
    println!("  Peak occupancy: {}/{}", m.stats.peak_occupancy, m.config.depth);
    println!("  Trace digest: {}", m.trace_digest);
    println!("  Duration: {}ms", m.finished_ms - m.started_ms);

    for v in &report.violations {
        println!("  tick {}: {}", v.tick, serde_json::to_string(&v.kind)?);
    }

    let passed = report.passed(strict);
    if passed {
        println!("✓ Run passed");
    } else {
        println!("✗ Run failed ({} violations)", report.violations.len());
    }
    Ok(passed)
}

fn validate(path: &PathBuf) -> syncfifo_sim::error::Result<()> {
    let script = load_script(path)?;
    let cfg = script.resolved_config(&QueueConfig::from_env());
    validate_script(&script, &cfg)
}

fn explain(path: &PathBuf) -> syncfifo_sim::error::Result<()> {
    let script = load_script(path)?;
    let cfg = script.resolved_config(&QueueConfig::from_env());
    validate_script(&script, &cfg)?;

    println!("Queue Configuration");
    println!("===================");
    println!("  Depth: {}", cfg.depth);
    println!("  Data width: {} bits (mask {:#x})", cfg.data_width, cfg.word_mask());
    println!("  Full-write policy: {:?}", cfg.full_write);
    println!();
    println!("Ticks ({} total):", script.tick_count());
    for line in script.summary_lines() {
        println!("  {}", line);
    }
    Ok(())
}
