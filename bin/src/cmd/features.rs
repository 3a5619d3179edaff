//! Features command implementation.

use std::path::Path;

use anyhow::Result;
use navpick::{NavpickConfig, Pipeline, ScoredCandidate};
use tracing::info;

use crate::{OutputFormat, data};

/// Print the feature set, pattern and score of every series.
pub(crate) fn show_features(prices: &Path, config: NavpickConfig, format: OutputFormat) -> Result<()> {
    let pipeline = Pipeline::new(config)?;
    let candidates = data::candidates(data::load_prices(prices)?, None);

    let scored: Vec<ScoredCandidate> = candidates
        .iter()
        .filter_map(|c| {
            let scored = pipeline.score(c);
            if scored.is_none() {
                info!(id = %c.id, points = c.series.len(), "insufficient history");
            }
            scored
        })
        .collect();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&scored)?);
        return Ok(());
    }

    let hold = pipeline.config().features.hold_days;
    println!(
        "{:<10} {:>9} {:>8} {:>8} {:>7} {:>8} {:>5} {:>8}  pattern",
        "id",
        "score",
        format!("ret{hold}"),
        "ret20",
        "vol20",
        "mdd20",
        "pos",
        "bias20"
    );
    println!("{}", "-".repeat(90));
    for c in &scored {
        let f = &c.features;
        println!(
            "{:<10} {:>9.4} {:>7.2}% {:>7.2}% {:>6.2}% {:>7.2}% {:>5.2} {:>7.2}%  {}",
            c.id,
            c.score,
            f.ret_hold * 100.0,
            f.ret_20 * 100.0,
            f.vol_20 * 100.0,
            f.mdd_20 * 100.0,
            f.pos_ratio_20,
            f.bias_20 * 100.0,
            c.pattern.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}
