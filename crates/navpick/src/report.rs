//! Results of one pipeline run.

use std::fmt;

use navpick_select::{MarketFilterMode, MarketRegime, SelectionResult};
use navpick_traits::{Result, ScoredCandidate, Symbol};
use serde::{Deserialize, Serialize};

/// A pool member left out of scoring for lack of history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skipped {
    /// Security identifier.
    pub id: Symbol,
    /// Display name.
    pub name: String,
    /// Observations needed.
    pub required: usize,
    /// Observations available.
    pub available: usize,
}

/// Everything a selection run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Holding horizon the features were computed with.
    pub hold_days: usize,
    /// Market filter mode in effect.
    pub mode: MarketFilterMode,
    /// Market regime, if the filter was enabled and data was available.
    pub regime: Option<MarketRegime>,
    /// Scored candidates in pool order.
    pub scored: Vec<ScoredCandidate>,
    /// Candidates with insufficient history, in pool order.
    pub skipped: Vec<Skipped>,
    /// Selection outcome.
    pub selection: SelectionResult,
}

impl RunReport {
    /// True when a blocking risk-off regime stopped the run.
    pub const fn halted(&self) -> bool {
        self.selection.halted
    }

    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| e.to_string().into())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.regime {
            Some(regime) => writeln!(f, "Market: {regime} [{}]", self.mode)?,
            None => writeln!(f, "Market: filter unavailable")?,
        }

        if self.halted() {
            return writeln!(f, "Risk-off in block mode: no candidates selected.");
        }

        writeln!(
            f,
            "Scored: {} | skipped: {} | ineligible: {}",
            self.scored.len(),
            self.skipped.len(),
            self.selection.ineligible.len()
        )?;
        writeln!(f)?;
        writeln!(f, "Top {} candidates:", self.selection.selected.len())?;

        let diversified = self.selection.selected.len() - self.selection.backfilled;
        for (i, c) in self.selection.selected.iter().enumerate() {
            let ft = &c.features;
            write!(
                f,
                "{:>2}. [{}] {} | score={:.4} | ret{}={:.2}% | ret20={:.2}% | vol20={:.2}% | mdd20={:.2}%",
                i + 1,
                c.id,
                c.name,
                c.score,
                self.hold_days,
                ft.ret_hold * 100.0,
                ft.ret_20 * 100.0,
                ft.vol_20 * 100.0,
                ft.mdd_20 * 100.0,
            )?;
            if let Some(pattern) = &c.pattern {
                write!(f, " | pattern={pattern}")?;
            }
            if i >= diversified {
                write!(f, " (backfilled)")?;
            }
            writeln!(f)?;
        }

        if !self.selection.rejected.is_empty() {
            writeln!(f)?;
            writeln!(f, "Rejected for correlation:")?;
            for r in &self.selection.rejected {
                let navpick_select::RejectReason::HighCorrelation { with } = &r.reason;
                writeln!(
                    f,
                    "    [{}] {} | score={:.4} | corr={:.2} with {}",
                    r.candidate.id, r.candidate.name, r.candidate.score, r.max_corr, with
                )?;
            }
        }

        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped for short history:")?;
            for s in &self.skipped {
                writeln!(f, "    [{}] {} | {}/{} points", s.id, s.name, s.available, s.required)?;
            }
        }

        Ok(())
    }
}
