//! Fetch command - fetch one URL with retry/backoff.

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use webgrit_fetch::fetch_with_retry;

use crate::commands::{RequestArgs, TransportArgs};
use crate::output::{print_json, print_outcome_text};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the fetch command.
#[derive(Args)]
pub struct FetchArgs {
    /// URL to fetch.
    pub url: String,

    #[command(flatten)]
    pub request: RequestArgs,

    #[command(flatten)]
    pub transport: TransportArgs,
}

/// Runs the fetch command.
pub async fn run(args: &FetchArgs, cli: &Cli) -> Result<()> {
    let transport = args.transport.build_transport()?;
    let request = args.request.build_request(&args.url)?;

    info!(url = %args.url, retries = request.max_retries, "Fetching");

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received, cancelling");
            ctrl_c_cancel.cancel();
        }
    });

    let outcome = fetch_with_retry(&transport, &request, &cancel).await;

    match cli.format {
        OutputFormat::Json => print_json(&outcome, cli)?,
        OutputFormat::Text => print_outcome_text(&outcome, &args.url, None, cli),
    }

    if !outcome.is_success() {
        std::process::exit(ExitCode::FetchFailed as i32);
    }
    Ok(())
}
