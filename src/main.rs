//! Waitless CLI
//!
//! Loads a feed snapshot into the store and prints the OPD queue.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use waitless::config::{self, Settings};
use waitless::core::data;
use waitless::core::monitor::Monitor;
use waitless::QueueMode;

#[derive(Parser)]
#[command(name = "waitless", version, about = "Time-to-Risk patient prioritization")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Extra TOML settings layered over config/ and before WAITLESS_* variables
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the ranked queue for a feed file
    Queue {
        #[arg(long)]
        feed: PathBuf,
        /// risk-priority or arrival; defaults to the configured mode
        #[arg(long)]
        mode: Option<QueueMode>,
    },
    /// Print dashboard headline figures for a feed file
    Summary {
        #[arg(long)]
        feed: PathBuf,
    },
    /// Validate and print the effective settings
    CheckConfig,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_monitor(settings: &Settings, feed: &Path) -> Result<Monitor> {
    let raw = fs::read_to_string(feed).with_context(|| format!("Failed to read feed {}", feed.display()))?;
    let observations = data::parse_feed(&raw).context("Failed to parse feed")?;
    let monitor = Monitor::new(settings)?;
    for observation in observations {
        monitor.upsert(observation).context("Failed to ingest feed")?;
    }
    info!("Loaded {} patients from {}", monitor.snapshot().len(), feed.display());
    Ok(monitor)
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let settings = config::load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Queue { feed, mode } => {
            let mode = mode.unwrap_or(settings.default_mode);
            let monitor = load_monitor(&settings, &feed)?;
            let thresholds = monitor.thresholds();

            println!("{:<8} {:<10} {:>7} {:>10}  {:<9} {}", "Queue #", "Patient", "Risk %", "TTR (min)", "TTR", "Urgency");
            for (idx, record) in monitor.ranked(mode).iter().enumerate() {
                println!(
                    "{:<8} {:<10} {:>7.1} {:>10.0}  {:<9} {}",
                    idx + 1,
                    record.id(),
                    record.risk_probability(),
                    record.time_to_risk_minutes(),
                    record.ttr_level(&thresholds).as_str(),
                    record.urgency_level(&thresholds).as_str()
                );
            }
        }
        Commands::Summary { feed } => {
            let monitor = load_monitor(&settings, &feed)?;
            println!("{}", serde_json::to_string_pretty(&monitor.summary())?);
        }
        Commands::CheckConfig => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }
    Ok(())
}
