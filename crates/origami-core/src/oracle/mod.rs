//! Relevance scoring for folds
//!
//! An oracle rates each fold summary against the current context. Oracles may
//! fail or answer partially; [`score_folds`] turns whatever they return into a
//! total mapping with every score in [0, 1].

mod anthropic;
mod lexical;
mod neutral;

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::config::{OracleKind, RelevanceConfig};
use crate::fold::{FoldId, FoldLog};

pub use anthropic::AnthropicOracle;
pub use lexical::LexicalOracle;
pub use neutral::NeutralOracle;

/// What an oracle sees of a fold
#[derive(Debug, Clone, PartialEq)]
pub struct FoldDigest {
    pub id: FoldId,
    pub summary: String,
}

impl FoldDigest {
    /// Digests for every fold in the log, in creation order
    pub fn from_log(log: &FoldLog) -> Vec<Self> {
        log.folds()
            .iter()
            .map(|f| FoldDigest {
                id: f.id(),
                summary: f.summary().to_string(),
            })
            .collect()
    }
}

/// Oracle failures. These never escape [`score_folds`].
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    #[error("oracle request failed: {0}")]
    Transport(String),

    #[error("malformed oracle response: {0}")]
    Malformed(String),
}

/// Scores folds against the current context
pub trait RelevanceOracle {
    /// Short name used in diagnostics
    fn name(&self) -> &str;

    /// Score the given folds. The result may be partial or out of range.
    fn score(
        &self,
        folds: &[FoldDigest],
        context: &str,
    ) -> Result<HashMap<FoldId, f64>, OracleError>;
}

/// Total mapping of fold ids to scores
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreSheet {
    pub scores: BTreeMap<FoldId, f64>,
    /// True when the oracle failed and every score is the default
    pub degraded: bool,
}

impl ScoreSheet {
    pub fn get(&self, id: FoldId) -> Option<f64> {
        self.scores.get(&id).copied()
    }
}

/// Score every digest, substituting `default_score` wherever the oracle
/// fails, omits an id, or answers NaN. Other values are clamped to [0, 1].
pub fn score_folds(
    oracle: &dyn RelevanceOracle,
    folds: &[FoldDigest],
    context: &str,
    default_score: f64,
) -> ScoreSheet {
    if folds.is_empty() {
        return ScoreSheet::default();
    }

    let default_score = default_score.clamp(0.0, 1.0);
    let (raw, degraded) = match oracle.score(folds, context) {
        Ok(raw) => (raw, false),
        Err(e) => {
            tracing::warn!(
                oracle = oracle.name(),
                error = %e,
                default_score,
                "relevance oracle failed, using default scores"
            );
            (HashMap::new(), true)
        }
    };

    let mut missing = 0usize;
    let scores = folds
        .iter()
        .map(|digest| {
            let score = match raw.get(&digest.id) {
                Some(score) if !score.is_nan() => score.clamp(0.0, 1.0),
                _ => {
                    missing += 1;
                    default_score
                }
            };
            (digest.id, score)
        })
        .collect();

    if !degraded && missing > 0 {
        tracing::debug!(
            oracle = oracle.name(),
            missing,
            "oracle omitted folds, filled with default score"
        );
    }

    ScoreSheet { scores, degraded }
}

/// Build the oracle selected by configuration
pub fn build_oracle(config: &RelevanceConfig) -> Box<dyn RelevanceOracle> {
    match config.oracle {
        OracleKind::Anthropic => Box::new(AnthropicOracle::from_config(config)),
        OracleKind::Lexical => Box::new(LexicalOracle::new()),
        OracleKind::Neutral => Box::new(NeutralOracle::new(config.default_score)),
    }
}
