//! `origami reset` command

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use crate::commands::format::{print_json_status, print_records_header};
use origami_core::error::Result;
use origami_core::format::path_relative_to_cwd;

pub fn execute(ctx: &CommandContext, yes: bool) -> Result<()> {
    if !yes {
        origami_core::bail_usage!("reset deletes every fold; pass --yes to confirm");
    }

    let config = ctx.config()?;
    let store = ctx.open_store(&config);
    store.clear()?;

    let location = path_relative_to_cwd(store.root());
    match ctx.cli.format {
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                println!("Cleared fold log in {}", location);
            }
        }
        OutputFormat::Json => print_json_status(
            "reset",
            Some("fold log and detail blobs deleted"),
            &[("store", serde_json::json!(location))],
        )?,
        OutputFormat::Records => print_records_header("reset", &[("store", location)]),
    }
    Ok(())
}
