//! The fold log aggregate, the unit of persistence

use serde::{Deserialize, Serialize};

use super::{Fold, FoldId, FoldStatus};
use crate::error::{OrigamiError, Result};
use crate::tokens::TokenEstimator;
use crate::transcript::TurnRange;

/// Current fold log format version
pub const LOG_FORMAT_VERSION: u32 = 1;

fn default_version() -> u32 {
    LOG_FORMAT_VERSION
}

/// Ordered folds in creation order plus cached token accounting.
///
/// `total_summary_tokens` is derived from the members and recomputed on every
/// summary mutation and after every load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldLog {
    #[serde(default = "default_version")]
    version: u32,
    /// Write stamp used to detect concurrent writers
    #[serde(default)]
    revision: u64,
    #[serde(default)]
    session_id: Option<String>,
    /// Estimator pinned when the log was created
    #[serde(default, rename = "chars_per_token")]
    estimator: TokenEstimator,
    #[serde(default)]
    total_summary_tokens: usize,
    #[serde(default)]
    folds: Vec<Fold>,
}

impl Default for FoldLog {
    fn default() -> Self {
        Self::new(TokenEstimator::default())
    }
}

impl FoldLog {
    /// Create an empty log that will use `estimator` for all token counts
    pub fn new(estimator: TokenEstimator) -> Self {
        Self {
            version: LOG_FORMAT_VERSION,
            revision: 0,
            session_id: None,
            estimator,
            total_summary_tokens: 0,
            folds: Vec::new(),
        }
    }

    pub fn folds(&self) -> &[Fold] {
        &self.folds
    }

    pub fn len(&self) -> usize {
        self.folds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folds.is_empty()
    }

    pub fn get(&self, id: FoldId) -> Option<&Fold> {
        self.folds.iter().find(|f| f.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: FoldId) -> Result<&mut Fold> {
        self.folds
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(OrigamiError::FoldNotFound { id })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn set_revision(&mut self, revision: u64) {
        self.revision = revision;
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn set_session_id(&mut self, session_id: Option<String>) {
        if session_id.is_some() {
            self.session_id = session_id;
        }
    }

    pub fn estimator(&self) -> TokenEstimator {
        self.estimator
    }

    pub fn total_summary_tokens(&self) -> usize {
        self.total_summary_tokens
    }

    /// Sum of detail tokens over every fold, expanded or not
    pub fn total_detail_tokens(&self) -> usize {
        self.folds.iter().map(|f| f.detail_tokens).sum()
    }

    /// Folds currently marked unfolded
    pub fn unfolded(&self) -> impl Iterator<Item = &Fold> {
        self.folds.iter().filter(|f| f.status == FoldStatus::Unfolded)
    }

    /// Id the next created fold will receive
    pub fn next_id(&self) -> FoldId {
        self.folds
            .iter()
            .map(|f| f.id)
            .max()
            .map(|id| id.next())
            .unwrap_or(FoldId::new(1))
    }

    /// Highest turn index covered by any fold, or 0 for an empty log
    pub fn last_turn(&self) -> u32 {
        self.folds.iter().map(|f| f.turn_range.end).max().unwrap_or(0)
    }

    /// True if a fold with exactly this range is recorded
    pub fn has_range(&self, range: TurnRange) -> bool {
        self.folds.iter().any(|f| f.turn_range == range)
    }

    /// True if any recorded fold shares a turn with `range`
    pub fn overlaps(&self, range: TurnRange) -> bool {
        self.folds.iter().any(|f| f.turn_range.overlaps(&range))
    }

    pub(crate) fn recompute_totals(&mut self) {
        self.total_summary_tokens = self.folds.iter().map(|f| f.summary_tokens).sum();
    }

    /// Append a new fold, enforcing id and range ordering
    pub(crate) fn push(&mut self, fold: Fold) -> Result<&Fold> {
        if fold.id != self.next_id() {
            return Err(OrigamiError::invalid_value(
                "fold id",
                format!("{} (expected {})", fold.id, self.next_id()),
            ));
        }
        if fold.turn_range.start <= self.last_turn() || fold.turn_range.is_empty() {
            return Err(OrigamiError::invalid_value(
                "turn range",
                format!("{} (log already covers turns up to {})", fold.turn_range, self.last_turn()),
            ));
        }

        self.folds.push(fold);
        self.recompute_totals();
        Ok(&self.folds[self.folds.len() - 1])
    }

    /// Normalize derived state after deserialization and check invariants
    pub(crate) fn validate_loaded(&mut self) -> std::result::Result<(), String> {
        let pinned = TokenEstimator::new(self.estimator.chars_per_token());
        if pinned != self.estimator {
            tracing::warn!(
                chars_per_token = self.estimator.chars_per_token(),
                "invalid estimator divisor in fold log, using default"
            );
            self.estimator = pinned;
        }

        let mut last_end = 0;
        for (idx, fold) in self.folds.iter().enumerate() {
            let expected = FoldId::new(idx as u32 + 1);
            if fold.id != expected {
                return Err(format!("fold ids not sequential: found {} at position {}", fold.id, idx + 1));
            }
            if fold.turn_range.is_empty() || fold.turn_range.start <= last_end {
                return Err(format!("fold {} has out-of-order turn range {}", fold.id, fold.turn_range));
            }
            if !(0.0..=1.0).contains(&fold.relevance_score) {
                return Err(format!(
                    "fold {} relevance score {} outside [0, 1]",
                    fold.id, fold.relevance_score
                ));
            }
            last_end = fold.turn_range.end;
        }

        self.recompute_totals();
        Ok(())
    }
}
