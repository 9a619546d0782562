//! Budget-constrained selection of expanded folds
//!
//! Summaries are always resident, so their total is a floor cost charged
//! before any detail is admitted. Among folds marked unfolded, the most
//! relevant are admitted greedily while their detail fits the remaining
//! budget and the expansion cap is not reached; the rest are demoted.

use std::cmp::Ordering;

use crate::config::OrigamiConfig;
use crate::error::Result;
use crate::fold::{Fold, FoldId, FoldLog, FoldStatus};
use crate::oracle::ScoreSheet;
use crate::store::FoldStore;

/// Budget constants for one restore pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    /// Total tokens the projection may use (`B`)
    pub total_tokens: usize,
    /// Maximum folds expanded at once (`K`)
    pub max_unfolded: usize,
}

impl Budget {
    pub fn new(total_tokens: usize, max_unfolded: usize) -> Self {
        Self {
            total_tokens,
            max_unfolded,
        }
    }

    pub fn from_config(config: &OrigamiConfig) -> Self {
        Self::new(config.budget_tokens(), config.budget.max_unfolded)
    }
}

/// Outcome of a selection pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Folds kept expanded, in admission order
    pub expanded: Vec<FoldId>,
    /// Folds that were unfolded but did not fit
    pub demoted: Vec<FoldId>,
    /// Budget left after summaries and admitted details. Negative when the
    /// summaries alone exceed the budget.
    pub remaining: i64,
}

impl Selection {
    pub fn is_expanded(&self, id: FoldId) -> bool {
        self.expanded.contains(&id)
    }
}

/// Candidate order: relevance descending, then lower id first
fn by_relevance(a: &&Fold, b: &&Fold) -> Ordering {
    b.relevance_score()
        .total_cmp(&a.relevance_score())
        .then_with(|| a.id().cmp(&b.id()))
}

/// Decides which unfolded folds stay expanded
#[derive(Debug, Clone, Copy)]
pub struct BudgetSelector {
    budget: Budget,
}

impl BudgetSelector {
    pub fn new(budget: Budget) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    /// Compute the selection without touching the log
    pub fn select(&self, log: &FoldLog) -> Selection {
        let mut remaining = self.budget.total_tokens as i64 - log.total_summary_tokens() as i64;

        let mut candidates: Vec<&Fold> = log.unfolded().collect();
        candidates.sort_by(by_relevance);

        let mut selection = Selection::default();
        for fold in candidates {
            let cost = fold.detail_tokens() as i64;
            if cost <= remaining && selection.expanded.len() < self.budget.max_unfolded {
                remaining -= cost;
                selection.expanded.push(fold.id());
            } else {
                selection.demoted.push(fold.id());
            }
        }
        selection.remaining = remaining;

        if remaining < 0 {
            tracing::warn!(
                budget = self.budget.total_tokens,
                summary_tokens = log.total_summary_tokens(),
                "summaries alone exceed the context budget"
            );
        }
        selection
    }

    /// Select, then write demotions back through the store
    pub fn apply(&self, store: &FoldStore, log: &mut FoldLog) -> Result<Selection> {
        let selection = self.select(log);
        for &id in &selection.demoted {
            store.set_status(log, id, FoldStatus::Folded)?;
        }
        tracing::debug!(
            expanded = selection.expanded.len(),
            demoted = selection.demoted.len(),
            remaining = selection.remaining,
            "budget selection applied"
        );
        Ok(selection)
    }
}

/// Record fresh scores and set each scored fold's status by threshold:
/// unfolded at or above `threshold`, folded below it.
pub fn assign_initial_statuses(
    store: &FoldStore,
    log: &mut FoldLog,
    sheet: &ScoreSheet,
    threshold: f64,
) -> Result<()> {
    for (&id, &score) in &sheet.scores {
        store.set_relevance(log, id, score)?;
        let status = if score >= threshold {
            FoldStatus::Unfolded
        } else {
            FoldStatus::Folded
        };
        store.set_status(log, id, status)?;
    }
    Ok(())
}
