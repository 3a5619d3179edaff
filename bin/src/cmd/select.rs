//! Select command implementation.

use std::path::Path;

use anyhow::Result;
use navpick::{NavpickConfig, Pipeline};

use crate::{OutputFormat, data};

/// Score the pool and print the selection.
pub(crate) fn run_select(
    prices: &Path,
    pool: Option<&Path>,
    market: Option<&Path>,
    config: NavpickConfig,
    format: OutputFormat,
) -> Result<()> {
    let index_id = config.regime.index_id.clone();
    let pipeline = Pipeline::new(config)?;

    let series = data::load_prices(prices)?;
    let pool = pool.map(data::load_pool).transpose()?;
    let candidates = data::candidates(series, pool);
    let market = market
        .map(|path| data::load_series(path, &index_id))
        .transpose()?;

    let report = pipeline.run(&candidates, market.as_ref());

    match format {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
