//! `origami list` command

use serde_json::json;

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use crate::commands::format::{
    fold_record_line, fold_to_json, print_json_status, print_records_header,
};
use origami_core::error::Result;
use origami_core::projection::render_list;
use origami_core::tools::ToolController;

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let config = ctx.config()?;
    let tools = ToolController::new(ctx.open_store(&config));
    let log = tools.list()?;

    match ctx.cli.format {
        OutputFormat::Human => print!("{}", render_list(&log)),
        OutputFormat::Json => {
            let folds: Vec<serde_json::Value> = log.folds().iter().map(fold_to_json).collect();
            print_json_status(
                "ok",
                None,
                &[
                    ("fold_count", json!(log.len())),
                    ("unfolded", json!(log.unfolded().count())),
                    ("total_summary_tokens", json!(log.total_summary_tokens())),
                    ("total_detail_tokens", json!(log.total_detail_tokens())),
                    ("folds", json!(folds)),
                ],
            )?;
        }
        OutputFormat::Records => {
            print_records_header(
                "list",
                &[
                    ("store", tools.store().root().display().to_string()),
                    ("folds", log.len().to_string()),
                ],
            );
            for fold in log.folds() {
                println!("{}", fold_record_line(fold));
            }
        }
    }
    Ok(())
}
