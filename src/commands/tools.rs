//! Fold tool commands: `show`, `unfold`, `fold`, `summarize`

use std::io::{self, IsTerminal, Read};

use serde_json::json;

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use crate::commands::format::{
    fold_record_line, fold_to_json, print_json_status, print_records_header, wrap_records_body,
};
use origami_core::error::Result;
use origami_core::fold::{Fold, FoldId};
use origami_core::projection::{fold_header, render_fold_detail};
use origami_core::tools::{FoldWithDetail, ToolController};

fn controller(ctx: &CommandContext) -> Result<ToolController> {
    let config = ctx.config()?;
    Ok(ToolController::new(ctx.open_store(&config)))
}

pub fn execute_show(ctx: &CommandContext, id: FoldId) -> Result<()> {
    let result = controller(ctx)?.show(id)?;
    output_with_detail(ctx, "show", &result)
}

pub fn execute_unfold(ctx: &CommandContext, id: FoldId) -> Result<()> {
    let result = controller(ctx)?.unfold(id)?;
    output_with_detail(ctx, "unfold", &result)
}

pub fn execute_fold(ctx: &CommandContext, id: FoldId) -> Result<()> {
    let fold = controller(ctx)?.fold(id)?;

    match ctx.cli.format {
        OutputFormat::Human => println!("{}\n{}", fold_header(&fold), fold.summary()),
        OutputFormat::Json => print_json_status("folded", None, &[("fold", fold_to_json(&fold))])?,
        OutputFormat::Records => print_fold_record("fold", &fold),
    }
    Ok(())
}

pub fn execute_summarize(ctx: &CommandContext, id: FoldId, text: Option<&str>) -> Result<()> {
    let summary = match text {
        Some(text) => text.to_string(),
        None => read_summary_from_stdin()?,
    };

    let update = controller(ctx)?.rewrite_summary(id, &summary)?;

    match ctx.cli.format {
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                println!(
                    "{}: summary {} -> {} tok (total summaries {} tok)",
                    update.fold.id(),
                    update.previous_tokens,
                    update.fold.summary_tokens(),
                    update.total_summary_tokens
                );
            }
        }
        OutputFormat::Json => print_json_status(
            "updated",
            None,
            &[
                ("fold", fold_to_json(&update.fold)),
                ("previous_tokens", json!(update.previous_tokens)),
                ("total_summary_tokens", json!(update.total_summary_tokens)),
            ],
        )?,
        OutputFormat::Records => print_fold_record("summarize", &update.fold),
    }
    Ok(())
}

fn read_summary_from_stdin() -> Result<String> {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        origami_core::bail_usage!("no summary text given; pass TEXT or pipe it on stdin");
    }
    let mut text = String::new();
    stdin.read_to_string(&mut text)?;
    Ok(text)
}

fn output_with_detail(ctx: &CommandContext, mode: &str, result: &FoldWithDetail) -> Result<()> {
    match ctx.cli.format {
        OutputFormat::Human => print!("{}", render_fold_detail(&result.fold, &result.detail)),
        OutputFormat::Json => {
            let mut fold = fold_to_json(&result.fold);
            if let Some(obj) = fold.as_object_mut() {
                obj.insert("detail".to_string(), json!(result.detail));
            }
            print_json_status("ok", None, &[("fold", fold)])?;
        }
        OutputFormat::Records => {
            print_fold_record(mode, &result.fold);
            wrap_records_body(&result.fold.id().to_string(), &result.detail);
        }
    }
    Ok(())
}

fn print_fold_record(mode: &str, fold: &Fold) {
    print_records_header(mode, &[]);
    println!("{}", fold_record_line(fold));
}
