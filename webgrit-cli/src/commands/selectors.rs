//! Selectors command - resolve keywords to candidate locators.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use webgrit_browser::SelectorResolver;

use crate::output::print_json;
use crate::{Cli, OutputFormat};

/// Arguments for the selectors command.
#[derive(Args)]
pub struct SelectorsArgs {
    /// Keyword or raw locator to resolve. Lists known keywords if omitted.
    pub input: Option<String>,

    /// Extend the built-in table from a JSON file of keyword -> locators.
    #[arg(long)]
    pub table: Option<PathBuf>,
}

/// Runs the selectors command.
pub async fn run(args: &SelectorsArgs, cli: &Cli) -> Result<()> {
    let resolver = match &args.table {
        Some(path) => SelectorResolver::from_file(path).await?,
        None => SelectorResolver::new(),
    };

    match &args.input {
        Some(input) => {
            let candidates = resolver.resolve(input);
            if cli.format == OutputFormat::Json {
                return print_json(
                    &serde_json::json!({ "input": input, "candidates": candidates }),
                    cli,
                );
            }
            for candidate in &candidates {
                println!("{candidate}");
            }
        }
        None => {
            let keywords: Vec<&str> = resolver.keywords().collect();
            if cli.format == OutputFormat::Json {
                return print_json(&keywords, cli);
            }
            for keyword in keywords {
                println!("{:<16} {}", keyword, resolver.resolve(keyword).join("  "));
            }
        }
    }
    Ok(())
}
