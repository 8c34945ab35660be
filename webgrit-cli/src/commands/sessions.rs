//! Sessions command - list, show, and delete saved session snapshots.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tracing::info;
use webgrit_browser::SessionStore;
use webgrit_core::ErrorKind;

use crate::output::print_json;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the sessions command.
#[derive(Args)]
pub struct SessionsArgs {
    /// Session directory (defaults to the platform data dir).
    #[arg(long)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub action: SessionAction,
}

/// Session subcommands.
#[derive(Subcommand)]
pub enum SessionAction {
    /// List saved sessions.
    List,
    /// Show one session's full contents.
    Show {
        /// Session name.
        name: String,
    },
    /// Delete a saved session.
    Delete {
        /// Session name.
        name: String,
    },
}

/// Runs the sessions command.
pub async fn run(args: &SessionsArgs, cli: &Cli) -> Result<()> {
    let store = match &args.dir {
        Some(dir) => SessionStore::new(dir.clone()),
        None => SessionStore::open_default(),
    };

    match &args.action {
        SessionAction::List => list(&store, cli).await,
        SessionAction::Show { name } => show(&store, name, cli).await,
        SessionAction::Delete { name } => delete(&store, name, cli).await,
    }
}

async fn list(store: &SessionStore, cli: &Cli) -> Result<()> {
    let summaries = store.list().await?;

    if cli.format == OutputFormat::Json {
        return print_json(&summaries, cli);
    }

    if summaries.is_empty() {
        println!("No saved sessions in {}", store.dir().display());
        return Ok(());
    }

    println!("{:<24} {:>8} {:<20} SAVED", "NAME", "COOKIES", "DOMAINS");
    for summary in &summaries {
        println!(
            "{:<24} {:>8} {:<20} {}",
            summary.name,
            summary.cookie_count,
            summary.domains.join(","),
            summary.saved_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

async fn show(store: &SessionStore, name: &str, cli: &Cli) -> Result<()> {
    let session = match store.load(name).await {
        Ok(session) => session,
        Err(e) => {
            if matches!(e.kind(), ErrorKind::NotFound(_)) {
                eprintln!("Session not found: {name}");
                std::process::exit(ExitCode::SessionMissing as i32);
            }
            eprintln!("Error [{}]: {e}", e.kind().label());
            std::process::exit(ExitCode::Error as i32);
        }
    };

    if cli.format == OutputFormat::Json {
        return print_json(&session, cli);
    }

    println!("Session:  {}", session.name);
    println!("Saved:    {}", session.saved_at.format("%Y-%m-%d %H:%M:%S"));
    if let Some(url) = &session.last_url {
        println!("Last URL: {url}");
    }
    println!("Cookies ({}):", session.cookies.len());
    for cookie in &session.cookies {
        let flags = match (cookie.secure, cookie.http_only) {
            (true, true) => " [secure, httpOnly]",
            (true, false) => " [secure]",
            (false, true) => " [httpOnly]",
            (false, false) => "",
        };
        println!("  {}@{}{}{}", cookie.name, cookie.domain, cookie.path, flags);
    }
    Ok(())
}

async fn delete(store: &SessionStore, name: &str, cli: &Cli) -> Result<()> {
    let removed = store.delete(name).await?;
    info!(name, removed, "Session delete");

    if cli.format == OutputFormat::Json {
        return print_json(&serde_json::json!({ "name": name, "removed": removed }), cli);
    }

    if removed {
        println!("Deleted session: {name}");
    } else {
        eprintln!("Session not found: {name}");
        std::process::exit(ExitCode::SessionMissing as i32);
    }
    Ok(())
}
