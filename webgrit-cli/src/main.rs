// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Webgrit CLI - resilient fetching and session tooling from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Fetch one URL with retries
//! webgrit fetch https://example.com --retries 3
//!
//! # Batch fetch with bounded concurrency
//! webgrit batch https://a.com https://b.com https://c.com --concurrency 2
//!
//! # JSON output
//! webgrit fetch https://example.com --format json --pretty
//!
//! # Saved sessions
//! webgrit sessions list
//! webgrit sessions show prod-login
//! webgrit sessions delete prod-login
//!
//! # Selector keywords
//! webgrit selectors
//! webgrit selectors login_button
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{batch, fetch, selectors, sessions, trace};

// ============================================================================
// CLI Definition
// ============================================================================

/// Webgrit CLI - resilient fetch and session orchestration.
#[derive(Parser)]
#[command(name = "webgrit")]
#[command(about = "Resilient fetching, session snapshots, and selector tooling")]
#[command(long_about = r#"
Webgrit fetches URLs with retry/backoff, runs bounded-concurrency
batches, and manages saved browser session snapshots.

Examples:
  webgrit fetch https://example.com             # Single fetch
  webgrit batch https://a.com https://b.com     # Batch fetch
  webgrit sessions list                         # Saved sessions
  webgrit selectors login_button                # Selector candidates
"#)]
#[command(version)]
#[command(author = "Webgrit Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a single URL with retry/backoff.
    #[command(visible_alias = "f")]
    Fetch(fetch::FetchArgs),

    /// Fetch many URLs under a concurrency limit.
    #[command(visible_alias = "b")]
    Batch(batch::BatchArgs),

    /// Manage saved session snapshots.
    #[command(visible_alias = "s")]
    Sessions(sessions::SessionsArgs),

    /// Resolve selector keywords to candidate locators.
    Selectors(selectors::SelectorsArgs),

    /// Format an exported network trace file.
    Trace(trace::TraceArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Fetch finished with failed outcomes.
    FetchFailed = 2,
    /// Session not found.
    SessionMissing = 3,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("webgrit=debug,info")
    } else {
        EnvFilter::new("webgrit=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Fetch(args) => fetch::run(args, &cli).await,
        Commands::Batch(args) => batch::run(args, &cli).await,
        Commands::Sessions(args) => sessions::run(args, &cli).await,
        Commands::Selectors(args) => selectors::run(args, &cli).await,
        Commands::Trace(args) => trace::run(args, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}
