//! `origami guide` command

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use crate::commands::format::{print_json_status, print_records_header, wrap_records_body};
use origami_core::error::Result;
use origami_core::projection::GUIDE;

pub fn execute(ctx: &CommandContext) -> Result<()> {
    match ctx.cli.format {
        OutputFormat::Human => print!("{}", GUIDE),
        OutputFormat::Json => {
            print_json_status("ok", None, &[("guide", serde_json::json!(GUIDE))])?
        }
        OutputFormat::Records => {
            print_records_header("guide", &[]);
            wrap_records_body("guide", GUIDE);
        }
    }
    Ok(())
}
