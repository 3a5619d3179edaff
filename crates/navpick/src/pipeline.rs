//! End-to-end selection run over a candidate pool.

use std::collections::HashMap;

use navpick_features::FeatureEngine;
use navpick_score::LinearScorer;
use navpick_select::{MarketFilterMode, MarketRegimeFilter, SelectionEngine, SelectionResult};
use navpick_traits::{
    Candidate, FeatureSet, PriceSeries, Result, ReturnSeries, ScoredCandidate, Scorer, Symbol,
};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::NavpickConfig;
use crate::report::{RunReport, Skipped};

/// Per-candidate outcome of the parallel evaluation stage.
enum Evaluation {
    Scored(ScoredCandidate, ReturnSeries),
    Skipped(Skipped),
}

/// Wires the feature, scoring, regime, and selection engines together.
///
/// Candidate evaluation runs in parallel on the rayon pool. Results are
/// collected in pool order, so ranking ties resolve the same way regardless
/// of scheduling.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: NavpickConfig,
    features: FeatureEngine,
    scorer: LinearScorer,
    regime: MarketRegimeFilter,
    selection: SelectionEngine,
}

impl Pipeline {
    /// Builds a pipeline, validating the configuration first.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration section is invalid.
    pub fn new(config: NavpickConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            features: FeatureEngine::new(config.features.clone())?,
            scorer: LinearScorer::try_new(config.weights)?,
            regime: MarketRegimeFilter::new(config.regime.clone())?,
            selection: SelectionEngine::new(config.selection.clone())?,
            config,
        })
    }

    /// The configuration in use.
    pub const fn config(&self) -> &NavpickConfig {
        &self.config
    }

    /// The feature engine in use.
    pub const fn feature_engine(&self) -> &FeatureEngine {
        &self.features
    }

    /// The scorer in use.
    pub const fn scorer(&self) -> &LinearScorer {
        &self.scorer
    }

    /// Scores one candidate, or returns `None` when its history is too short.
    pub fn score(&self, candidate: &Candidate) -> Option<ScoredCandidate> {
        let features = self.features.compute(&candidate.series).ok()?;
        Some(self.scored(candidate, features))
    }

    /// Runs regime filtering, scoring, and selection over `pool`.
    pub fn run(&self, pool: &[Candidate], market: Option<&PriceSeries>) -> RunReport {
        let mode = self.regime.mode();
        let regime = self.regime.evaluate(market);
        if let Some(regime) = &regime {
            info!(%regime, %mode, "market regime");
        }

        let mut report = RunReport {
            hold_days: self.config.features.hold_days,
            mode,
            regime,
            scored: Vec::new(),
            skipped: Vec::new(),
            selection: SelectionResult::default(),
        };

        if mode == MarketFilterMode::Block
            && report.regime.as_ref().is_some_and(|r| !r.risk_on)
        {
            info!("risk-off in block mode, skipping candidate evaluation");
            report.selection = SelectionResult::halted();
            return report;
        }

        let evaluations: Vec<Evaluation> = pool.par_iter().map(|c| self.evaluate(c)).collect();

        let mut returns: HashMap<Symbol, ReturnSeries> = HashMap::with_capacity(pool.len());
        for evaluation in evaluations {
            match evaluation {
                Evaluation::Scored(candidate, window) => {
                    returns.insert(candidate.id.clone(), window);
                    report.scored.push(candidate);
                }
                Evaluation::Skipped(skipped) => report.skipped.push(skipped),
            }
        }

        info!(
            pool = pool.len(),
            scored = report.scored.len(),
            skipped = report.skipped.len(),
            "candidates evaluated"
        );

        report.selection =
            self.selection
                .select(&report.scored, &returns, report.regime.as_ref(), mode);
        report
    }

    fn evaluate(&self, candidate: &Candidate) -> Evaluation {
        match self.features.compute(&candidate.series) {
            Ok(features) => {
                let scored = self.scored(candidate, features);
                debug!(id = %scored.id, score = scored.score, "candidate scored");
                Evaluation::Scored(scored, self.selection.return_window(&candidate.series))
            }
            Err(short) => Evaluation::Skipped(Skipped {
                id: candidate.id.clone(),
                name: candidate.name.clone(),
                required: short.required,
                available: short.available,
            }),
        }
    }

    fn scored(&self, candidate: &Candidate, features: FeatureSet) -> ScoredCandidate {
        ScoredCandidate {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            score: self.scorer.score(&features),
            pattern: self.features.pattern(&candidate.series),
            features,
        }
    }
}
