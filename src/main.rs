// src/main.rs
//! Replay driver for the URL restriction guard
//!
//! In production the pipeline is invoked in-process by the platform's
//! notification dispatcher. This binary stands in for that dispatcher during
//! development: it loads a guard configuration and a recorded stream of
//! UI-change notifications, replays every event through the pipeline with a
//! dry-run launcher, and reports the outcome of each run.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use url_restriction_guard::core::{FilterPipeline, LoggingLauncher, PipelineOutcome};
use url_restriction_guard::replay::{load_events, ReplayEvent};
use url_restriction_guard::GuardConfig;

/// Command line interface for the replay driver
#[derive(Debug, Parser)]
#[command(
    name = "url-guard",
    about = "Replay recorded UI-change notifications through the URL restriction pipeline",
    long_about = "Loads a guard configuration and a JSON fixture of recorded UI-change \
notifications, then runs every notification through the detection-and-decision pipeline \
with a dry-run launcher. No redirect commands leave the process."
)]
struct Args {
    /// Guard configuration file (JSON); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Recorded notification stream to replay (JSON array)
    #[arg(long)]
    events: PathBuf,

    /// Output format for per-event outcomes
    #[arg(long, default_value = "human", value_enum)]
    format: OutputFormat,

    /// Verbosity level for logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable outcome lines
    Human,
    /// One JSON record per event
    Json,
}

fn setup_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "url_restriction_guard=info",
        1 => "url_restriction_guard=debug",
        _ => "url_restriction_guard=trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_outcome(args: &Args, index: usize, event: &ReplayEvent, outcome: &PipelineOutcome) {
    match args.format {
        OutputFormat::Json => {
            let record = serde_json::json!({
                "index": index,
                "package_name": event.package_name,
                "event_time_ms": event.event_time_ms,
                "result": outcome,
            });
            println!("{record}");
        }
        OutputFormat::Human => {
            let package = event.package_name.as_deref().unwrap_or("<no source app>");
            let detail = match outcome {
                PipelineOutcome::Redirected { address, .. } => {
                    format!("redirected away from {address}")
                }
                PipelineOutcome::Allowed { address, .. } => format!("allowed {address}"),
                PipelineOutcome::Suppressed { address, .. } => {
                    format!("suppressed repeat of {address}")
                }
                PipelineOutcome::NotApplicable { reason } => format!("skipped ({reason:?})"),
                PipelineOutcome::Failed { error } => format!("failed ({error})"),
            };
            println!(
                "[{index:>4}] t={:>8}ms {:<32} {}",
                event.event_time_ms, package, detail
            );
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = match &args.config {
        Some(path) => GuardConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GuardConfig::default(),
    };
    info!(
        restricted_prefix = %config.restricted_prefix,
        fallback_address = %config.fallback_address,
        cooldown_ms = config.cooldown_ms,
        browsers = config.browsers.len(),
        "guard configured"
    );

    let events = load_events(&args.events)
        .with_context(|| format!("loading events from {}", args.events.display()))?;
    let pipeline = FilterPipeline::from_config(&config, Box::new(LoggingLauncher));

    let started = chrono::Local::now();
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();

    for (index, replay_event) in events.iter().enumerate() {
        let outcome = pipeline.handle_event(replay_event.clone().into_event());
        *counts.entry(outcome.label()).or_insert(0) += 1;
        print_outcome(&args, index, replay_event, &outcome);
    }

    if matches!(args.format, OutputFormat::Human) {
        println!("\n📊 Replay summary ({})", started.format("%Y-%m-%d %H:%M:%S"));
        println!("   events: {}", events.len());
        for (label, count) in &counts {
            println!("   {label}: {count}");
        }
    }

    Ok(())
}
