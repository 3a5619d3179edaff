//! CLI subcommand modules.

pub(crate) mod backtest;
pub(crate) mod features;
pub(crate) mod select;
