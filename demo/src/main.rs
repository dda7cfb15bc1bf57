//! DRIFTWATCH — Demo CLI
//!
//! Validates a newline-delimited JSON stream against a schema and prints
//! the end-of-session drift report.
//!
//! Usage:
//!   cargo run -p demo -- --schema schema.json --inputs data.ndjson
//!   cargo run -p demo -- --schema schema.json --inputs data.ndjson --info-values
//!   RUST_LOG=debug cargo run -p demo -- --schema schema.json --inputs data.ndjson

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use driftwatch_contracts::Schema;
use driftwatch_core::{SessionOptions, Tracker};
use driftwatch_report::{log_track_report, render_report};

// ── CLI definition ────────────────────────────────────────────────────────────

/// DRIFTWATCH — runtime value validation and schema drift detection.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Validate an NDJSON input stream against a schema and report drift"
)]
struct Cli {
    /// Path to the schema, as JSON.
    #[arg(long)]
    schema: PathBuf,

    /// Path to the inputs, one JSON object per line.
    #[arg(long)]
    inputs: PathBuf,

    /// Disable drift detection (per-input validation only).
    #[arg(long)]
    no_inspect: bool,

    /// Collect per-property statistics in the final report.
    #[arg(long)]
    info_values: bool,

    /// Report each (property, issue kind) pair at most once.
    #[arg(long)]
    summary: bool,

    /// Emit the final report as JSON instead of rendered lines.
    #[arg(long)]
    json: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Structured logging; set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("demo error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let schema: Schema = serde_json::from_str(&fs::read_to_string(&cli.schema)?)?;
    let tracker = Tracker::new(schema)?.summary_result(cli.summary);

    let mut session = tracker.session(SessionOptions {
        inspect: !cli.no_inspect,
        info_values: cli.info_values,
    })?;

    let mut tracked = 0u64;
    let mut failed = 0u64;
    for (number, line) in fs::read_to_string(&cli.inputs)?.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let input: serde_json::Value =
            serde_json::from_str(line).map_err(|e| format!("line {}: {e}", number + 1))?;

        let report = session.track(&input)?;
        tracked += 1;
        if !report.success {
            failed += 1;
            log_track_report(&report);
        }
    }

    let report = session.end();
    tracing::info!(tracked, failed, "stream processed");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in render_report(&report) {
            println!("{line}");
        }
    }
    Ok(())
}
