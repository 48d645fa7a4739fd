//! drivelog_dump - parse NMF drive-test logs and print the result
//!
//! Usage: `drivelog_dump [--json] <file>...`
//!
//! Without `--json` a one-block summary is printed per file. With `--json`
//! the full parse result of every file is written to stdout as a JSON array.
//! Log verbosity follows `RUST_LOG` (default `info`), e.g.
//! `RUST_LOG=drivelog=trace` to see every discarded measurement.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use drivelog::parsers::{Nmf, ParseResult};
use drivelog::settings::ParserSettings;

/// Log directives used when `RUST_LOG` is unset or invalid
const DEFAULT_LOG_FILTER: &str = "info";

/// Arguments for the `drivelog_dump` binary
#[derive(Parser, Debug)]
#[command(
    name = "drivelog_dump",
    version,
    about = "Parse NMF drive-test logs and print a summary or JSON",
    long_about = None,
)]
struct Args {
    /// Print the full parse results as JSON instead of a summary
    #[arg(long, default_value_t = false)]
    json: bool,

    /// NMF log files to parse
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

/// Build the log filter from `RUST_LOG`-style directives
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn print_summary(path: &Path, result: &ParseResult) {
    let stats = &result.stats;
    println!("{}", path.display());
    println!("  technology:    {}", result.technology);
    println!("  lines:         {}", stats.lines);
    println!(
        "  measurements:  {} of {} ({} without GPS, {} bad level)",
        result.measurements.len(),
        stats.measurement_records,
        stats.discarded_no_gps,
        stats.discarded_level
    );
    println!("  signaling:     {}", result.signaling.len());
    let events = result.signaling.iter().filter(|e| e.event.is_some()).count();
    println!("  events:        {}", events);
    let types: Vec<&str> = stats.record_types.iter().map(String::as_str).collect();
    println!("  record types:  {}", types.join(" "));
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so JSON output stays clean
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let parser = Nmf::with_settings(ParserSettings::load());

    let mut results = Vec::with_capacity(args.files.len());
    for (path, result) in args.files.iter().zip(parser.parse_files(&args.files)) {
        let result = result.with_context(|| format!("Failed to parse {}", path.display()))?;
        results.push((path, result));
    }

    if args.json {
        let all: Vec<&ParseResult> = results.iter().map(|(_, r)| r).collect();
        let out = serde_json::to_string_pretty(&all).context("Failed to serialize result")?;
        println!("{}", out);
    } else {
        for (path, result) in &results {
            print_summary(path, result);
        }
    }

    Ok(())
}
