//! Shared outcome formatting for the fetch and batch commands.

use anyhow::Result;
use serde::Serialize;
use webgrit_core::FetchOutcome;

use crate::Cli;

/// Serializes any value as JSON, honoring `--pretty`.
pub fn print_json<T: Serialize>(value: &T, cli: &Cli) -> Result<()> {
    let json = if cli.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

/// Prints one outcome as a text line, with an optional index prefix.
pub fn print_outcome_text(outcome: &FetchOutcome, url: &str, index: Option<usize>, cli: &Cli) {
    let prefix = match index {
        Some(i) => format!("[{i}] "),
        None => String::new(),
    };

    match outcome {
        FetchOutcome::Success {
            status,
            body,
            attempts,
            ..
        } => {
            println!(
                "{prefix}{url}  HTTP {status}  ({attempts} attempt{}, {} bytes)",
                plural(*attempts),
                body.len()
            );
        }
        FetchOutcome::Failure {
            kind,
            message,
            attempts,
        } => {
            println!(
                "{prefix}{url}  FAILED [{}]  ({attempts} attempt{}): {message}",
                kind.label(),
                plural(*attempts)
            );
        }
    }

    if !cli.quiet {
        if let FetchOutcome::Success { body, .. } = outcome {
            if cli.verbose {
                println!("{body}");
            }
        }
    }
}

fn plural(n: u32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::plural;

    #[test]
    fn test_plural_suffix() {
        assert_eq!(plural(1), "");
        assert_eq!(plural(2), "s");
    }
}
