//! Command trait and context for dispatching commands

use std::path::PathBuf;
use std::time::Instant;

use crate::cli::paths::resolve_store_path;
use crate::cli::Cli;
use origami_core::config::OrigamiConfig;
use origami_core::error::Result;
use origami_core::store::paths::{CONFIG_FILE, DEFAULT_STORE_DIR};
use origami_core::store::FoldStore;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub root: &'a PathBuf,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, root: &'a PathBuf, start: Instant) -> Self {
        Self { cli, root, start }
    }

    /// Store directory: `--store` (resolved against the root) or `<root>/.origami`
    pub fn store_dir(&self) -> PathBuf {
        resolve_store_path(self.root, self.cli.store.as_deref())
            .unwrap_or_else(|| self.root.join(DEFAULT_STORE_DIR))
    }

    /// Configuration from the store's `config.toml` with environment
    /// overrides applied. Not yet validated so callers can layer flags on top.
    pub fn load_config(&self) -> Result<OrigamiConfig> {
        let mut config = OrigamiConfig::load_or_default(&self.store_dir().join(CONFIG_FILE))?;
        config.apply_env();
        Ok(config)
    }

    /// Validated configuration without command-line overrides
    pub fn config(&self) -> Result<OrigamiConfig> {
        let config = self.load_config()?;
        config.validate()?;
        Ok(config)
    }

    pub fn open_store(&self, config: &OrigamiConfig) -> FoldStore {
        FoldStore::open(&self.store_dir(), config.estimator())
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("origami {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Multi-resolution context folding for long-running agent sessions.");
        println!();
        println!("Run `origami --help` for usage information.");
        Ok(())
    }
}
