//! Backtest command implementation.

use std::path::Path;

use anyhow::Result;
use navpick::NavpickConfig;
use navpick::eval::{BacktestHarness, BacktestReport};
use navpick::features::FeatureEngine;
use navpick::score::LinearScorer;
use serde::Serialize;

use crate::{OutputFormat, data};

#[derive(Serialize)]
struct BacktestOutput<'a> {
    #[serde(flatten)]
    report: &'a BacktestReport,
    strength: navpick::eval::IcStrength,
    high_score_dates: Vec<navpick::Date>,
}

/// Replay features and scores over one series and print the IC.
pub(crate) fn run_backtest(
    prices: &Path,
    config: NavpickConfig,
    quantile: f64,
    format: OutputFormat,
) -> Result<()> {
    anyhow::ensure!(
        (0.0..=1.0).contains(&quantile),
        "quantile must lie in [0, 1], got {quantile}"
    );

    let id = prices
        .file_stem()
        .map_or_else(|| "series".to_string(), |s| s.to_string_lossy().into_owned());
    let series = data::load_series(prices, &id)?;

    let harness = BacktestHarness::new(
        FeatureEngine::new(config.features)?,
        LinearScorer::try_new(config.weights)?,
    );
    let report = harness.run(&series);
    let high_score_dates = report.high_score_dates(quantile);

    match format {
        OutputFormat::Json => {
            let output = BacktestOutput {
                report: &report,
                strength: report.strength(),
                high_score_dates,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("Series:   {} ({} points)", report.id, series.len());
            println!("Horizon:  {} days", report.hold_days);
            println!("Samples:  {}", report.records.len());
            println!("IC:       {}", fmt_ic(report.ic));
            println!("Rank IC:  {}", fmt_ic(report.rank_ic));
            println!("Signal:   {}", report.strength());
            println!();
            println!(
                "Dates with score above the {:.0}th percentile ({}):",
                quantile * 100.0,
                high_score_dates.len()
            );
            for date in &high_score_dates {
                println!("  {date}");
            }
        }
    }

    Ok(())
}

fn fmt_ic(ic: Option<f64>) -> String {
    ic.map_or_else(|| "undefined".to_string(), |ic| format!("{ic:.4}"))
}
