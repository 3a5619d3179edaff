//! navpick CLI binary.
//!
//! Ranks a pool of funds by their momentum score, selects a diversified
//! Top-N, and backtests the scoring formula on a single series.

mod cmd;
mod data;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use navpick::NavpickConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "navpick")]
#[command(about = "Short-horizon momentum ranking and diversified fund selection", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a candidate pool and select a diversified Top-N
    Select {
        /// Long-format prices CSV (id,date,value)
        #[arg(short, long)]
        prices: PathBuf,

        /// Candidate pool CSV (id,name); defaults to every id in the prices file
        #[arg(long)]
        pool: Option<PathBuf>,

        /// Market index CSV (date,value) for the regime filter
        #[arg(short, long)]
        market: Option<PathBuf>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Replay the score over one series and report its IC
    Backtest {
        /// Single-series CSV (date,value)
        #[arg(short, long)]
        prices: PathBuf,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Score quantile above which dates are listed
        #[arg(short, long, default_value = "0.9")]
        quantile: f64,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print features, pattern and score for every series
    Features {
        /// Long-format prices CSV (id,date,value)
        #[arg(short, long)]
        prices: PathBuf,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the effective configuration as TOML
    Config {
        /// TOML configuration file to merge over the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Select {
            prices,
            pool,
            market,
            config,
            format,
        } => {
            let config = load_config(config.as_deref())?;
            cmd::select::run_select(&prices, pool.as_deref(), market.as_deref(), config, format)?;
        }
        Commands::Backtest {
            prices,
            config,
            quantile,
            format,
        } => {
            let config = load_config(config.as_deref())?;
            cmd::backtest::run_backtest(&prices, config, quantile, format)?;
        }
        Commands::Features {
            prices,
            config,
            format,
        } => {
            let config = load_config(config.as_deref())?;
            cmd::features::show_features(&prices, config, format)?;
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}

/// Read and validate a TOML configuration, or fall back to defaults.
fn load_config(path: Option<&Path>) -> Result<NavpickConfig> {
    let Some(path) = path else {
        return Ok(NavpickConfig::default());
    };
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    NavpickConfig::from_toml_str(&source)
        .with_context(|| format!("Invalid config: {}", path.display()))
}
