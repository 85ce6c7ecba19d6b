//! Validate decklist files against Scrollrack from the command line.

use std::{path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use services::services::{
    batch_validation::{BatchReport, BatchValidator, DecklistEntry, EntryOutcome},
    decklist_parser::prepare_for_validation,
    retry::RetryPolicy,
    scrollrack::{ScrollrackClient, ScrollrackConfig},
};
use utils::logging::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "validate-decklists", about = "Check Commander decklists with Scrollrack")]
struct Args {
    /// Decklist files (TopDeck sectioned format, or plaintext with --commander)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Treat files as plaintext lists and put this commander in the command zone.
    /// Partners are written as "A / B".
    #[arg(long)]
    commander: Option<String>,

    #[arg(long, default_value_t = 3)]
    max_attempts: u32,

    #[arg(long, default_value_t = 1000)]
    base_delay_ms: u64,

    #[arg(long, default_value_t = 10)]
    concurrency: usize,

    /// Pause between chunks of concurrent requests
    #[arg(long, default_value_t = 20)]
    chunk_delay_ms: u64,

    #[arg(long, env = "SCROLLRACK_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "SCROLLRACK_TIMEOUT_SECS")]
    timeout_secs: Option<String>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing("warn,validate_decklists=info");
    let args = Args::parse();

    let config =
        ScrollrackConfig::from_values(args.api_url.as_deref(), args.timeout_secs.as_deref())?;
    let client = ScrollrackClient::new(&config)?;
    debug!(
        endpoint = client.endpoint(),
        timeout_secs = config.timeout.as_secs(),
        "Scrollrack client ready"
    );

    let mut entries = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let decklist = match &args.commander {
            Some(commander) => prepare_for_validation(&text, commander),
            None => text,
        };
        info!(file = %path.display(), bytes = decklist.len(), "Queued decklist");
        entries.push(DecklistEntry {
            id: path.display().to_string(),
            decklist: Some(decklist),
        });
    }

    let report = BatchValidator::new(Arc::new(client))
        .with_retry(RetryPolicy::new(
            args.max_attempts,
            Duration::from_millis(args.base_delay_ms),
        ))
        .with_concurrency(args.concurrency)
        .with_chunk_delay(Duration::from_millis(args.chunk_delay_ms))
        .run(entries)
        .await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for outcome in &report.outcomes {
            println!("{}: {}", outcome.id, describe(outcome));
        }
        let stats = report.stats;
        println!(
            "\n{} valid, {} invalid, {} unavailable, {} skipped",
            stats.valid, stats.invalid, stats.unknown, stats.skipped
        );
    }

    Ok(exit_code(&report))
}

fn describe(outcome: &EntryOutcome) -> String {
    if outcome.skipped {
        return "skipped (empty)".to_string();
    }
    match outcome.valid {
        Some(true) => "valid".to_string(),
        Some(false) => format!("invalid: {}", outcome.errors.join("; ")),
        None if outcome.errors.is_empty() => "unavailable".to_string(),
        None => format!("unavailable: {}", outcome.errors.join("; ")),
    }
}

/// 1 when any deck is illegal, 2 when any could not be checked.
fn exit_code(report: &BatchReport) -> ExitCode {
    if report.stats.invalid > 0 {
        ExitCode::from(1)
    } else if report.stats.unknown > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(valid: Option<bool>, errors: &[&str], skipped: bool) -> EntryOutcome {
        EntryOutcome {
            id: "deck.txt".into(),
            valid,
            errors: errors.iter().map(|e| e.to_string()).collect(),
            skipped,
        }
    }

    #[test]
    fn describes_outcomes() {
        assert_eq!(describe(&outcome(Some(true), &[], false)), "valid");
        assert_eq!(
            describe(&outcome(Some(false), &["Unknown Card: Foo", "Deck size 99"], false)),
            "invalid: Unknown Card: Foo; Deck size 99"
        );
        assert_eq!(describe(&outcome(None, &[], false)), "unavailable");
        assert_eq!(
            describe(&outcome(None, &["Scrollrack API error: 400 Bad Request"], false)),
            "unavailable: Scrollrack API error: 400 Bad Request"
        );
        assert_eq!(describe(&outcome(None, &[], true)), "skipped (empty)");
    }

    #[test]
    fn parses_arguments() {
        let args = Args::try_parse_from([
            "validate-decklists",
            "--commander",
            "Thrasios, Triton Hero / Tymna the Weaver",
            "--max-attempts",
            "5",
            "a.txt",
            "b.txt",
        ])
        .unwrap();
        assert_eq!(args.files.len(), 2);
        assert_eq!(args.max_attempts, 5);
        assert_eq!(args.base_delay_ms, 1000);
        assert_eq!(args.chunk_delay_ms, 20);
        assert!(!args.json);
    }

    #[test]
    fn parses_chunk_delay() {
        let args = Args::try_parse_from([
            "validate-decklists",
            "--chunk-delay-ms",
            "0",
            "--concurrency",
            "4",
            "a.txt",
        ])
        .unwrap();
        assert_eq!(args.chunk_delay_ms, 0);
        assert_eq!(args.concurrency, 4);
        assert!(
            Args::try_parse_from(["validate-decklists", "--chunk-delay-ms", "soon", "a.txt"])
                .is_err()
        );
    }

    #[test]
    fn requires_a_file() {
        assert!(Args::try_parse_from(["validate-decklists"]).is_err());
    }
}
