//! Command implementations for all origami commands

use crate::cli::Commands;
use crate::commands;
use crate::commands::dispatch::command::{Command, CommandContext};
use origami_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Ingest(args) => commands::ingest::execute(ctx, args),
            Commands::Restore(args) => commands::restore::execute(ctx, args),
            Commands::List => commands::list::execute(ctx),
            Commands::Show(args) => commands::tools::execute_show(ctx, args.id),
            Commands::Unfold(args) => commands::tools::execute_unfold(ctx, args.id),
            Commands::Fold(args) => commands::tools::execute_fold(ctx, args.id),
            Commands::Summarize(args) => {
                commands::tools::execute_summarize(ctx, args.id, args.text.as_deref())
            }
            Commands::Reset(args) => commands::reset::execute(ctx, args.yes),
            Commands::Guide => commands::guide::execute(ctx),
            Commands::Config => commands::config::execute(ctx),
        }
    }
}
