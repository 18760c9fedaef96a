//! Command-line front end for crash-chain
//!
//! Renders the outcome chain and threshold distances for a manual seed, or
//! follows the live feed and re-renders on every seed change.

use anyhow::{Context, Result};
use clap::Parser;
use crash_chain::chain::session::{DEFAULT_AMOUNT, MAX_AMOUNT};
use crash_chain::chain::{bet_point, format_bet_point, ChainSession, ThresholdSet};
use crash_chain::feed::{FeedBuilder, FeedConfig};
use crash_chain::types::ChainSnapshot;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "crash-chain")]
#[command(about = "Provably fair outcome chain analytics with a live seed feed")]
#[command(version)]
struct Cli {
    /// Seed to derive the chain from. Without it the live feed supplies seeds.
    #[arg(long)]
    seed: Option<String>,

    /// Number of outcomes to derive
    #[arg(
        long,
        default_value_t = DEFAULT_AMOUNT,
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(i64).range(..=MAX_AMOUNT)
    )]
    amount: i64,

    /// Threshold multiplier, repeatable. Colours are assigned in palette order.
    #[arg(long = "threshold")]
    thresholds: Vec<f64>,

    /// Print one snapshot for --seed and exit
    #[arg(long)]
    once: bool,

    /// Print snapshots as JSON
    #[arg(long)]
    json: bool,

    /// Event-stream endpoint for the live feed
    #[arg(long)]
    endpoint: Option<String>,

    /// Poll cadence of the live feed in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Lifetime of one feed request in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Total deposit for the bet calculator
    #[arg(long)]
    deposit: Option<f64>,

    /// Planned number of shots for the bet calculator
    #[arg(long)]
    shots: Option<i64>,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    info!("Starting crash-chain");

    if let (Some(deposit), Some(shots)) = (cli.deposit, cli.shots) {
        println!("Bet per shot: {}", format_bet_point(bet_point(deposit, shots)));
    }

    let thresholds = if cli.thresholds.is_empty() {
        ThresholdSet::default()
    } else {
        ThresholdSet::from_values(&cli.thresholds)
    };
    let mut session = ChainSession::new()
        .with_amount(cli.amount)
        .with_thresholds(thresholds);

    if let Some(seed) = cli.seed.as_deref() {
        let snapshot = session.set_seed(seed);
        print_snapshot(snapshot, cli.json)?;
        if cli.once {
            return Ok(());
        }
    } else if cli.once {
        anyhow::bail!("--once requires --seed");
    }

    let mut builder = FeedBuilder::new();
    if let Some(endpoint) = cli.endpoint {
        builder = builder.with_endpoint(endpoint);
    }
    if let Some(interval) = cli.poll_interval_ms {
        builder = builder.with_poll_interval(interval);
    }
    if let Some(timeout) = cli.timeout_ms {
        builder = builder.with_request_timeout(timeout);
    }
    let capacity = FeedConfig::default().channel_capacity;

    // Create communication channels
    let (event_sender, event_receiver) = mpsc::channel(capacity);
    let (snapshot_sender, mut snapshot_receiver) = mpsc::channel::<ChainSnapshot>(capacity);

    let ingestor = Arc::new(builder.build_http(event_sender)?);

    let feed_handle = tokio::spawn(ingestor.run());
    let session_handle = tokio::spawn(session.run(event_receiver, snapshot_sender));

    let json = cli.json;
    let render_handle = tokio::spawn(async move {
        while let Some(snapshot) = snapshot_receiver.recv().await {
            if let Err(e) = print_snapshot(&snapshot, json) {
                tracing::error!("Failed to render snapshot: {}", e);
            }
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutting down");

    feed_handle.abort();
    session_handle.abort();
    render_handle.abort();

    Ok(())
}

/// Print one snapshot as text or JSON.
fn print_snapshot(snapshot: &ChainSnapshot, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string(snapshot).context("Failed to serialize snapshot")?
        );
        return Ok(());
    }

    if snapshot.outcomes.is_empty() {
        println!("(no outcomes)");
        return Ok(());
    }

    let prefix: String = snapshot.seed.chars().take(16).collect();
    println!("Seed {}... ({} outcomes)", prefix, snapshot.outcomes.len());

    let cells: Vec<String> = snapshot
        .rendered
        .iter()
        .map(|r| format!("{}[{}]", r.display, r.classification))
        .collect();
    for row in cells.chunks(10) {
        println!("  {}", row.join(" "));
    }

    let top: Vec<String> = snapshot
        .report
        .top
        .iter()
        .map(|d| format!("{}:{}", d.target, d.distance))
        .collect();
    let other: Vec<String> = snapshot
        .report
        .other
        .iter()
        .map(|d| format!("{}:{}", d.target, d.distance))
        .collect();
    println!("Distances (from anchor)  {}", top.join("  "));
    println!("Distances (from start)   {}", other.join("  "));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_is_capped() {
        let cli = Cli::try_parse_from(["crash-chain", "--amount", "1000000"]).unwrap();
        assert_eq!(cli.amount, MAX_AMOUNT);

        let cli = Cli::try_parse_from(["crash-chain", "--amount", "-5"]).unwrap();
        assert_eq!(cli.amount, -5);

        assert!(Cli::try_parse_from(["crash-chain", "--amount", "1000001"]).is_err());
        assert!(Cli::try_parse_from(["crash-chain", "--amount", "9223372036854775807"]).is_err());
    }
}
