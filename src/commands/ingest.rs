//! `origami ingest` command
//!
//! Runs before the host compacts its context. The transcript comes from a
//! path argument or, when invoked as a hook, from the `transcript_path` field
//! of the JSON payload on stdin.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::json;

use crate::cli::{IngestArgs, OutputFormat};
use crate::commands::dispatch::CommandContext;
use crate::commands::format::{
    fold_record_line, fold_to_json, print_json_status, print_records_header,
};
use origami_core::error::{OrigamiError, Result};
use origami_core::oracle::build_oracle;
use origami_core::pipeline::{self, IngestOptions, IngestReport};
use origami_core::projection::render_compaction_instructions;
use origami_core::transcript::Transcript;

/// Payload a host hook writes to stdin
#[derive(Debug, Deserialize)]
struct HookInput {
    transcript_path: Option<PathBuf>,
    session_id: Option<String>,
}

pub fn execute(ctx: &CommandContext, args: &IngestArgs) -> Result<()> {
    let (path, hook_session) = match &args.transcript {
        Some(path) => (path.clone(), None),
        None => read_hook_input()?,
    };

    let transcript = read_transcript(&path)?;
    tracing::debug!(
        turns = transcript.turns.len(),
        skipped = transcript.skipped,
        path = %path.display(),
        "transcript parsed"
    );

    let config = ctx.config()?;
    let store = ctx.open_store(&config);
    let oracle = build_oracle(&config.relevance);

    let options = IngestOptions {
        session_id: args.session_id.clone().or(hook_session),
        context: args.context.clone(),
    };
    let report = pipeline::ingest(&store, &config, oracle.as_ref(), &transcript, options)?;

    match ctx.cli.format {
        OutputFormat::Human => output_human(ctx, &report),
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Records => output_records(&report),
    }
    Ok(())
}

fn read_hook_input() -> Result<(PathBuf, Option<String>)> {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        origami_core::bail_usage!("no transcript path given; pass TRANSCRIPT or pipe hook JSON on stdin");
    }
    let mut raw = String::new();
    stdin.read_to_string(&mut raw)?;
    if raw.trim().is_empty() {
        origami_core::bail_usage!("no transcript path given and no hook input on stdin");
    }

    let hook: HookInput = serde_json::from_str(&raw).map_err(|e| {
        OrigamiError::UsageError(format!("hook input on stdin is not valid JSON: {}", e))
    })?;
    match hook.transcript_path {
        Some(path) => Ok((path, hook.session_id)),
        None => origami_core::bail_usage!("hook input has no transcript_path"),
    }
}

fn read_transcript(path: &Path) -> Result<Transcript> {
    let content = fs::read_to_string(path)
        .map_err(|e| OrigamiError::io_operation("read transcript", path.display(), e))?;
    Ok(Transcript::parse(&content))
}

fn output_human(ctx: &CommandContext, report: &IngestReport) {
    if report.log.is_empty() {
        if !ctx.cli.quiet {
            println!("No conversation sections to fold yet.");
        }
        return;
    }
    print!(
        "{}",
        render_compaction_instructions(&report.log, &report.new_folds)
    );
}

fn output_json(report: &IngestReport) -> Result<()> {
    let new_folds: Vec<String> = report.new_folds.iter().map(ToString::to_string).collect();
    let folds: Vec<serde_json::Value> = report.log.folds().iter().map(fold_to_json).collect();
    print_json_status(
        "ok",
        None,
        &[
            ("new_folds", json!(new_folds)),
            ("fold_count", json!(report.log.len())),
            ("duplicates", json!(report.duplicates)),
            ("overlaps", json!(report.overlaps)),
            ("degraded", json!(report.degraded)),
            ("total_summary_tokens", json!(report.log.total_summary_tokens())),
            ("folds", json!(folds)),
        ],
    )
}

fn output_records(report: &IngestReport) {
    print_records_header(
        "ingest",
        &[
            ("folds", report.log.len().to_string()),
            ("new", report.new_folds.len().to_string()),
            ("degraded", report.degraded.to_string()),
        ],
    );
    for fold in report.log.folds() {
        println!("{}", fold_record_line(fold));
    }
}
