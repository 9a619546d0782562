//! Manual fold operations for the agent between restores
//!
//! Each operation loads the log, applies one change and saves. A failed
//! lookup returns `FoldNotFound` before anything is written. These operations
//! bypass the budget selector: a manual unfold may exceed the budget until
//! the next restore demotes it.

use crate::error::Result;
use crate::fold::{Fold, FoldId, FoldLog, FoldStatus};
use crate::store::FoldStore;

/// A fold together with its full detail
#[derive(Debug, Clone, PartialEq)]
pub struct FoldWithDetail {
    pub fold: Fold,
    pub detail: String,
}

/// Outcome of a summary rewrite
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryUpdate {
    pub fold: Fold,
    pub previous_tokens: usize,
    pub total_summary_tokens: usize,
}

/// Tool surface over a fold store
#[derive(Debug, Clone)]
pub struct ToolController {
    store: FoldStore,
}

impl ToolController {
    pub fn new(store: FoldStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &FoldStore {
        &self.store
    }

    /// Current log, read only
    pub fn list(&self) -> Result<FoldLog> {
        self.store.load()
    }

    /// A fold and its detail, read only
    pub fn show(&self, id: FoldId) -> Result<FoldWithDetail> {
        let log = self.store.load()?;
        let fold = self.store.get(&log, id)?.clone();
        let detail = self.store.read_detail(id)?;
        Ok(FoldWithDetail { fold, detail })
    }

    /// Mark a fold unfolded and return its detail
    pub fn unfold(&self, id: FoldId) -> Result<FoldWithDetail> {
        let mut log = self.store.load()?;
        self.store.get(&log, id)?;
        let detail = self.store.read_detail(id)?;

        let fold = self
            .store
            .set_status(&mut log, id, FoldStatus::Unfolded)?
            .clone();
        self.store.save(&mut log)?;

        tracing::debug!(%id, "unfolded");
        Ok(FoldWithDetail { fold, detail })
    }

    /// Mark a fold folded and return it
    pub fn fold(&self, id: FoldId) -> Result<Fold> {
        let mut log = self.store.load()?;
        let fold = self
            .store
            .set_status(&mut log, id, FoldStatus::Folded)?
            .clone();
        self.store.save(&mut log)?;

        tracing::debug!(%id, "folded");
        Ok(fold)
    }

    /// Replace a fold's summary and recompute token accounting
    pub fn rewrite_summary(&self, id: FoldId, summary: &str) -> Result<SummaryUpdate> {
        let summary = summary.trim();
        if summary.is_empty() {
            crate::bail_usage!("summary text is empty");
        }

        let mut log = self.store.load()?;
        let previous_tokens = self.store.get(&log, id)?.summary_tokens();
        let fold = self.store.set_summary(&mut log, id, summary)?.clone();
        self.store.save(&mut log)?;

        tracing::debug!(%id, previous_tokens, tokens = fold.summary_tokens(), "summary rewritten");
        Ok(SummaryUpdate {
            fold,
            previous_tokens,
            total_summary_tokens: log.total_summary_tokens(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrigamiError;
    use crate::tokens::TokenEstimator;
    use crate::transcript::{Section, TurnRange};
    use std::fs;
    use tempfile::tempdir;

    fn controller(dir: &std::path::Path) -> ToolController {
        let store = FoldStore::open(dir, TokenEstimator::default());
        let mut log = store.load().unwrap();
        for (start, end) in [(1, 4), (5, 8)] {
            let section = Section {
                turns: Vec::new(),
                turn_range: TurnRange::new(start, end),
                files_touched: Default::default(),
                content: format!("detail for turns {start}-{end}"),
            };
            store
                .create_fold(&mut log, &section, format!("summary {start}"))
                .unwrap();
        }
        store.save(&mut log).unwrap();
        ToolController::new(store)
    }

    #[test]
    fn test_unfold_returns_detail_and_persists() {
        let dir = tempdir().unwrap();
        let tools = controller(dir.path());
        let result = tools.unfold(FoldId::new(1)).unwrap();
        assert_eq!(result.detail, "detail for turns 1-4");
        assert!(result.fold.is_unfolded());
        assert!(tools.list().unwrap().get(FoldId::new(1)).unwrap().is_unfolded());
    }

    #[test]
    fn test_fold_returns_summary() {
        let dir = tempdir().unwrap();
        let tools = controller(dir.path());
        tools.unfold(FoldId::new(2)).unwrap();
        let fold = tools.fold(FoldId::new(2)).unwrap();
        assert_eq!(fold.summary(), "summary 5");
        assert_eq!(fold.status(), FoldStatus::Folded);
    }

    #[test]
    fn test_unknown_id_is_not_found_and_unchanged() {
        let dir = tempdir().unwrap();
        let tools = controller(dir.path());
        let state = tools.store().state_path();
        let before = fs::read(&state).unwrap();

        let missing = FoldId::new(999);
        assert!(matches!(
            tools.unfold(missing).unwrap_err(),
            OrigamiError::FoldNotFound { .. }
        ));
        assert!(matches!(
            tools.fold(missing).unwrap_err(),
            OrigamiError::FoldNotFound { .. }
        ));
        assert!(tools.rewrite_summary(missing, "text").unwrap_err().is_not_found());
        assert!(tools.show(missing).unwrap_err().is_not_found());

        assert_eq!(fs::read(&state).unwrap(), before);
    }

    #[test]
    fn test_rewrite_summary_updates_totals() {
        let dir = tempdir().unwrap();
        let tools = controller(dir.path());
        let update = tools
            .rewrite_summary(
                FoldId::new(1),
                "auth.mid>fix: jwt.decode>jwt.verify | sig.validation.added | D:auth.mid.ts",
            )
            .unwrap();

        let log = tools.list().unwrap();
        let sum: usize = log.folds().iter().map(|f| f.summary_tokens()).sum();
        assert_eq!(update.total_summary_tokens, sum);
        assert_eq!(log.total_summary_tokens(), sum);
        assert!(update.fold.summary_tokens() > update.previous_tokens);
    }

    #[test]
    fn test_rewrite_summary_rejects_empty_text() {
        let dir = tempdir().unwrap();
        let tools = controller(dir.path());
        let err = tools.rewrite_summary(FoldId::new(1), "   ").unwrap_err();
        assert!(matches!(err, OrigamiError::UsageError(_)));
    }

    #[test]
    fn test_unfold_with_missing_blob_leaves_status() {
        let dir = tempdir().unwrap();
        let tools = controller(dir.path());
        fs::remove_file(tools.store().detail_path(FoldId::new(1))).unwrap();
        assert!(matches!(
            tools.unfold(FoldId::new(1)).unwrap_err(),
            OrigamiError::DetailMissing { .. }
        ));
        assert!(!tools.list().unwrap().get(FoldId::new(1)).unwrap().is_unfolded());
    }
}
