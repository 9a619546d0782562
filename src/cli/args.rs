//! Command argument structures

use std::path::PathBuf;

use clap::Args;
use origami_core::fold::FoldId;

fn parse_fold_id(s: &str) -> Result<FoldId, String> {
    s.parse::<FoldId>().map_err(|e| e.to_string())
}

/// Arguments for the ingest command.
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Transcript file (JSONL); reads hook JSON from stdin when omitted
    #[arg(value_name = "TRANSCRIPT")]
    pub transcript: Option<PathBuf>,

    /// Session identifier recorded in the fold log
    #[arg(long)]
    pub session_id: Option<String>,

    /// Score folds against this text instead of the last user turn
    #[arg(long)]
    pub context: Option<String>,
}

/// Arguments for the restore command.
#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Fraction of the context window spent on folds, in (0, 1]
    #[arg(long)]
    pub budget_fraction: Option<f64>,

    /// Context window size in tokens
    #[arg(long)]
    pub context_window: Option<usize>,

    /// Maximum number of folds expanded to full detail
    #[arg(long)]
    pub max_unfolded: Option<usize>,
}

/// Arguments for the show command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Fold id (F001, fold-001 or 1)
    #[arg(value_parser = parse_fold_id)]
    pub id: FoldId,
}

/// Arguments for the unfold command.
#[derive(Args, Debug)]
pub struct UnfoldArgs {
    /// Fold id (F001, fold-001 or 1)
    #[arg(value_parser = parse_fold_id)]
    pub id: FoldId,
}

/// Arguments for the fold command.
#[derive(Args, Debug)]
pub struct FoldArgs {
    /// Fold id (F001, fold-001 or 1)
    #[arg(value_parser = parse_fold_id)]
    pub id: FoldId,
}

/// Arguments for the summarize command.
#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Fold id (F001, fold-001 or 1)
    #[arg(value_parser = parse_fold_id)]
    pub id: FoldId,

    /// Replacement summary; read from stdin when omitted
    pub text: Option<String>,
}

/// Arguments for the reset command.
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Confirm deletion of every fold
    #[arg(long)]
    pub yes: bool,
}
