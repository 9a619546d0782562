//! `origami config` command: print the effective configuration

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use crate::commands::format::{print_records_data, print_records_header};
use origami_core::error::{OrigamiError, Result};

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let config = ctx.config()?;

    match ctx.cli.format {
        OutputFormat::Human => {
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| OrigamiError::Other(format!("failed to render config: {}", e)))?;
            print!("{}", rendered);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Records => {
            print_records_header(
                "config",
                &[("store", ctx.store_dir().display().to_string())],
            );
            print_records_data("oracle", &config.relevance.oracle.to_string());
            print_records_data("budget_tokens", &config.budget_tokens().to_string());
            print_records_data("max_unfolded", &config.budget.max_unfolded.to_string());
            print_records_data(
                "chars_per_token",
                &config.tokens.chars_per_token.to_string(),
            );
        }
    }
    Ok(())
}
