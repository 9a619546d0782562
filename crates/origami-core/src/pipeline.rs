//! Ingest and restore passes
//!
//! `ingest` runs before the host compacts its context: it folds any new
//! transcript turns, rescores the whole log and records initial statuses.
//! `restore` runs when context is rebuilt: it enforces the budget and renders
//! the projection.

use std::time::Instant;

use crate::budget::{assign_initial_statuses, Budget, BudgetSelector, Selection};
use crate::config::OrigamiConfig;
use crate::error::Result;
use crate::fold::{FoldId, FoldLog};
use crate::oracle::{score_folds, FoldDigest, RelevanceOracle};
use crate::projection::{Projection, ProjectionBlock};
use crate::store::FoldStore;
use crate::text::placeholder_summary;
use crate::phase_time;
use crate::transcript::{Sectioner, Transcript, Turn};

/// Per-run ingest inputs
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    pub session_id: Option<String>,
    /// Context to score against instead of the last user turn
    pub context: Option<String>,
}

/// Outcome of an ingest pass
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// Folds created by this pass, in order
    pub new_folds: Vec<FoldId>,
    /// Sections whose range was already recorded
    pub duplicates: usize,
    /// Sections skipped because they overlap a recorded range
    pub overlaps: usize,
    /// Oracle failed and every fold received the default score
    pub degraded: bool,
    /// Log as saved
    pub log: FoldLog,
}

/// Fold new transcript turns, rescore every fold and save.
pub fn ingest(
    store: &FoldStore,
    config: &OrigamiConfig,
    oracle: &dyn RelevanceOracle,
    transcript: &Transcript,
    options: IngestOptions,
) -> Result<IngestReport> {
    let start = Instant::now();
    let mut log = store.load()?;

    let last_turn = log.last_turn();
    let new_turns: &[Turn] = match transcript.turns.get(last_turn as usize..) {
        Some(turns) => turns,
        None => {
            tracing::warn!(
                turns = transcript.turns.len(),
                last_turn,
                "transcript is shorter than the fold log, nothing new to fold"
            );
            &[]
        }
    };

    let sections = Sectioner::new(config.sectioner_config()).section_from(new_turns, last_turn);
    phase_time!(start, "section_transcript", sections = sections.len());

    let mut report = IngestReport {
        new_folds: Vec::new(),
        duplicates: 0,
        overlaps: 0,
        degraded: false,
        log: FoldLog::default(),
    };

    for section in &sections {
        if log.has_range(section.turn_range) {
            report.duplicates += 1;
            continue;
        }
        if log.overlaps(section.turn_range) {
            tracing::warn!(range = %section.turn_range, "section overlaps a recorded fold, skipping");
            report.overlaps += 1;
            continue;
        }

        let summary = placeholder_summary(&section.content, config.summary.placeholder_chars);
        let fold = store.create_fold(&mut log, section, summary)?;
        report.new_folds.push(fold.id());
    }
    phase_time!(start, "create_folds", created = report.new_folds.len());

    if !log.is_empty() {
        let context = options
            .context
            .unwrap_or_else(|| transcript.last_user_text());
        let sheet = score_folds(
            oracle,
            &FoldDigest::from_log(&log),
            &context,
            config.relevance.default_score,
        );
        assign_initial_statuses(store, &mut log, &sheet, config.relevance.unfold_threshold)?;
        report.degraded = sheet.degraded;
        phase_time!(start, "score_folds", oracle = oracle.name());
    }

    log.set_session_id(options.session_id);
    store.save(&mut log)?;

    tracing::info!(
        new = report.new_folds.len(),
        total = log.len(),
        duplicates = report.duplicates,
        degraded = report.degraded,
        "ingest complete"
    );
    report.log = log;
    Ok(report)
}

/// Outcome of a restore pass
#[derive(Debug, Clone, Default)]
pub struct RestoreReport {
    pub selection: Selection,
    pub projection: Projection,
}

/// Enforce the budget, persist demotions and build the projection.
pub fn restore(store: &FoldStore, budget: Budget) -> Result<RestoreReport> {
    let start = Instant::now();
    let mut log = store.load()?;
    if log.is_empty() {
        tracing::debug!("no folds to restore");
        return Ok(RestoreReport::default());
    }

    let selection = BudgetSelector::new(budget).apply(store, &mut log)?;
    if !selection.demoted.is_empty() {
        store.save(&mut log)?;
    }

    let mut blocks = Vec::with_capacity(log.len());
    for fold in log.folds() {
        let detail = if selection.is_expanded(fold.id()) {
            match store.read_detail(fold.id()) {
                Ok(detail) => Some(detail),
                Err(e) => {
                    tracing::warn!(id = %fold.id(), error = %e, "expanded fold has no detail");
                    None
                }
            }
        } else {
            None
        };
        blocks.push(ProjectionBlock {
            fold: fold.clone(),
            detail,
        });
    }

    phase_time!(start, "restore", expanded = selection.expanded.len());
    Ok(RestoreReport {
        selection,
        projection: Projection {
            blocks,
            stored_tokens: log.total_detail_tokens(),
            summary_tokens: log.total_summary_tokens(),
        },
    })
}
