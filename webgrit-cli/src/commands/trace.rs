//! Trace command - format an exported network trace.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use webgrit_core::{NetworkTrace, TraceEntry};

use crate::output::print_json;
use crate::{Cli, OutputFormat};

/// Arguments for the trace command.
#[derive(Args)]
pub struct TraceArgs {
    /// Path to an exported trace JSON file.
    pub file: PathBuf,

    /// Only show failed exchanges (status >= 400 or unanswered).
    #[arg(long)]
    pub failures: bool,
}

/// Runs the trace command.
pub async fn run(args: &TraceArgs, cli: &Cli) -> Result<()> {
    let content = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("reading {}", args.file.display()))?;
    let trace: NetworkTrace =
        serde_json::from_str(&content).with_context(|| "parsing trace file")?;

    let entries: Vec<&TraceEntry> = trace
        .entries
        .iter()
        .filter(|entry| !args.failures || is_failure(entry))
        .collect();

    if cli.format == OutputFormat::Json {
        return print_json(&entries, cli);
    }

    println!(
        "Trace v{} by {} ({} entries)",
        trace.version,
        trace.creator,
        trace.entries.len()
    );
    for entry in &entries {
        let status = match entry.status {
            Some(status) => status.to_string(),
            None if entry.orphan => "?".to_string(),
            None => "pending".to_string(),
        };
        let method = entry
            .method
            .map(|m| m.as_str())
            .unwrap_or(if entry.orphan { "ORPHAN" } else { "-" });
        println!("{:<7} {:<8} {}", method, status, entry.url);
    }

    let failed = trace.entries.iter().filter(|e| is_failure(e)).count();
    println!("{failed}/{} failed", trace.entries.len());
    Ok(())
}

fn is_failure(entry: &TraceEntry) -> bool {
    match entry.status {
        Some(status) => status >= 400,
        None => !entry.orphan,
    }
}
