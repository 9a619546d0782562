//! `origami restore` command
//!
//! Runs when the host rebuilds its context. Flags override configuration
//! for this run only.

use serde_json::json;

use crate::cli::{OutputFormat, RestoreArgs};
use crate::commands::dispatch::CommandContext;
use crate::commands::format::{
    fold_record_line, fold_to_json, print_json_status, print_records_header, wrap_records_body,
};
use origami_core::budget::Budget;
use origami_core::config::OrigamiConfig;
use origami_core::error::Result;
use origami_core::pipeline::{self, RestoreReport};

pub fn execute(ctx: &CommandContext, args: &RestoreArgs) -> Result<()> {
    let mut config = ctx.load_config()?;
    apply_overrides(&mut config, args);
    config.validate()?;

    let store = ctx.open_store(&config);
    let budget = Budget::from_config(&config);
    tracing::debug!(
        total_tokens = budget.total_tokens,
        max_unfolded = budget.max_unfolded,
        "restore budget"
    );

    let report = pipeline::restore(&store, budget)?;

    match ctx.cli.format {
        OutputFormat::Human => print!("{}", report.projection.render()),
        OutputFormat::Json => output_json(&report, budget)?,
        OutputFormat::Records => output_records(&report, budget),
    }
    Ok(())
}

fn apply_overrides(config: &mut OrigamiConfig, args: &RestoreArgs) {
    if let Some(fraction) = args.budget_fraction {
        config.budget.budget_fraction = fraction;
    }
    if let Some(window) = args.context_window {
        config.budget.context_window = window;
    }
    if let Some(max) = args.max_unfolded {
        config.budget.max_unfolded = max;
    }
}

fn output_json(report: &RestoreReport, budget: Budget) -> Result<()> {
    let folds: Vec<serde_json::Value> = report
        .projection
        .blocks
        .iter()
        .map(|block| {
            let mut value = fold_to_json(&block.fold);
            if let (Some(obj), Some(detail)) = (value.as_object_mut(), &block.detail) {
                obj.insert("detail".to_string(), json!(detail));
            }
            value
        })
        .collect();
    let expanded: Vec<String> = report
        .selection
        .expanded
        .iter()
        .map(ToString::to_string)
        .collect();
    let demoted: Vec<String> = report
        .selection
        .demoted
        .iter()
        .map(ToString::to_string)
        .collect();

    print_json_status(
        "ok",
        None,
        &[
            ("budget_tokens", json!(budget.total_tokens)),
            ("max_unfolded", json!(budget.max_unfolded)),
            ("expanded", json!(expanded)),
            ("demoted", json!(demoted)),
            ("rendered_tokens", json!(report.projection.rendered_tokens())),
            ("folds", json!(folds)),
        ],
    )
}

fn output_records(report: &RestoreReport, budget: Budget) {
    print_records_header(
        "restore",
        &[
            ("folds", report.projection.blocks.len().to_string()),
            ("budget", budget.total_tokens.to_string()),
            ("expanded", report.selection.expanded.len().to_string()),
        ],
    );
    for block in &report.projection.blocks {
        println!("{}", fold_record_line(&block.fold));
        if let Some(detail) = &block.detail {
            wrap_records_body(&block.fold.id().to_string(), detail);
        }
    }
}
