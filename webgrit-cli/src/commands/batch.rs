//! Batch command - fetch many URLs under a concurrency limit.

use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use webgrit_fetch::BatchScheduler;

use crate::commands::{RequestArgs, TransportArgs};
use crate::output::{print_json, print_outcome_text};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// URLs to fetch. Outcomes are reported in the same order.
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Maximum requests in flight at once.
    #[arg(long, short, default_value = "4")]
    pub concurrency: usize,

    #[command(flatten)]
    pub request: RequestArgs,

    #[command(flatten)]
    pub transport: TransportArgs,
}

/// Runs the batch command.
pub async fn run(args: &BatchArgs, cli: &Cli) -> Result<()> {
    let transport = Arc::new(args.transport.build_transport()?);
    let requests = args
        .urls
        .iter()
        .map(|url| args.request.build_request(url))
        .collect::<Result<Vec<_>>>()?;

    info!(
        count = requests.len(),
        concurrency = args.concurrency,
        "Running batch"
    );

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received, cancelling batch");
            ctrl_c_cancel.cancel();
        }
    });

    let scheduler = BatchScheduler::new(transport);
    let outcomes = scheduler
        .run_batch(requests, args.concurrency, cancel)
        .await?;

    match cli.format {
        OutputFormat::Json => print_json(&outcomes, cli)?,
        OutputFormat::Text => {
            for (index, (url, outcome)) in args.urls.iter().zip(&outcomes).enumerate() {
                print_outcome_text(outcome, url, Some(index), cli);
            }
            let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
            println!("{succeeded}/{} succeeded", outcomes.len());
        }
    }

    if outcomes.iter().any(|o| !o.is_success()) {
        std::process::exit(ExitCode::FetchFailed as i32);
    }
    Ok(())
}
