//! Command line entry point for power-rating
//!
//! Loads configuration, opens the record cache, and prints either one
//! event's ratings or a scouting report as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use power_rating::config::AppConfig;
use power_rating::rating::ranker::compare_by_metric;
use power_rating::source::CachedRecordSource;
use power_rating::Scout;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Power Rating - offensive and defensive ratings for alliance competitions
#[derive(Parser)]
#[command(
    name = "power-rating",
    version,
    about = "Offensive and defensive power ratings from alliance match results",
    long_about = "Computes per-team least-squares contribution ratings (OPR/DPR style) from \
                 three-team alliance match results held in a local record cache, and builds \
                 scouting reports from each team's earlier events."
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Record cache override
    #[arg(long, global = true, value_name = "FILE", help = "Override record cache file")]
    cache: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        global = true,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Output file
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        help = "Write JSON output to a file instead of stdout"
    )]
    output: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short, long, global = true, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, global = true, help = "Validate configuration and exit")]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Rate every team at one event
    Event {
        #[arg(short, long, value_name = "KEY", help = "Event key, e.g. 2024misjo")]
        event: String,
    },
    /// Report each team's ratings at its earlier events of the season
    Scout {
        #[arg(short, long, value_name = "KEY", help = "Event key to scout for")]
        event: String,
    },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file/environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(cache) = &args.cache {
        config.source.cache_file = cache.clone();
    }

    power_rating::config::validate_config(&config)?;
    Ok(config)
}

/// Print JSON to stdout or write it to the output file
async fn emit<T: serde::Serialize>(value: &T, output: Option<&PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

async fn run(args: &Args, config: AppConfig) -> Result<()> {
    let source = Arc::new(CachedRecordSource::load(&config.source.cache_file).await?);
    let sort_by = config
        .rating
        .statistics
        .iter()
        .find_map(|s| s.rank_order.zip(s.offense.clone()));
    let scout = Scout::new(source, config.rating);

    match &args.command {
        Command::Event { event } => {
            let mut ratings = scout.rate_event(event).await?;
            if !ratings.insufficient.is_empty() {
                warn!(
                    "{}: not enough data yet for {}",
                    event,
                    ratings.insufficient.join(", ")
                );
            }
            if let Some((order, metric)) = &sort_by {
                ratings
                    .teams
                    .sort_by(|a, b| compare_by_metric(a, b, metric, *order));
            }
            emit(&ratings, args.output.as_ref()).await
        }
        Command::Scout { event } => {
            let reports = scout.process(event).await?;
            info!("Scouted {} teams for {}", reports.len(), event);
            emit(&reports, args.output.as_ref()).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if args.dry_run {
        info!("Configuration validation successful");
        info!("   Service: {}", config.service.name);
        info!("   Cache: {}", config.source.cache_file.display());
        info!("   Statistics: {}", config.rating.statistics.len());
        return Ok(());
    }

    if let Err(e) = run(&args, config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
