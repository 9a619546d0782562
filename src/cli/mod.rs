//! CLI argument parsing for origami
//!
//! Global flags: --root, --store, --format, --quiet, --verbose,
//! --log-level, --log-json

pub mod args;
pub mod output;
pub mod paths;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{
    FoldArgs, IngestArgs, ResetArgs, RestoreArgs, ShowArgs, SummarizeArgs, UnfoldArgs,
};
pub use output::OutputFormat;

/// Origami - multi-resolution context folding for agent sessions
#[derive(Parser, Debug)]
#[command(name = "origami")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base directory for resolving the store
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Explicit store directory
    #[arg(long, global = true, env = "ORIGAMI_STORE")]
    pub store: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_parser = output::format_parser())]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Debug logging, including timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level origami commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fold new transcript turns before the host compacts its context
    Ingest(IngestArgs),

    /// Enforce the budget and print the context projection
    Restore(RestoreArgs),

    /// List every fold with status, tokens and relevance
    List,

    /// Print a fold's summary and full detail without changing it
    Show(ShowArgs),

    /// Mark a fold unfolded and print its full detail
    Unfold(UnfoldArgs),

    /// Mark a fold folded and print its summary
    Fold(FoldArgs),

    /// Replace a fold's summary (reads stdin when TEXT is omitted)
    Summarize(SummarizeArgs),

    /// Delete every fold and its detail, keeping configuration
    Reset(ResetArgs),

    /// Print instructions for working with folds
    Guide,

    /// Print the effective configuration
    Config,
}
