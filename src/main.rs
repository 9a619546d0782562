//! Origami - context folding CLI for long-running agent sessions
//!
//! Folds a transcript into sections kept at two resolutions and rebuilds
//! context within a token budget.

mod cli;
mod commands;

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::Parser;

use cli::{Cli, OutputFormat};
use origami_core::error::{ExitCode as OrigamiExitCode, OrigamiError};
use origami_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return reject_arguments(err),
    };

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("origami: logging disabled: {}", e);
    }
    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => exit_with(OrigamiExitCode::Success),
        Err(e) => {
            report(&cli, &e);
            exit_with(e.exit_code())
        }
    }
}

/// Handle a clap failure. `Cli.format` does not exist yet, so a JSON request
/// is recovered from argv and answered with the error envelope.
fn reject_arguments(err: clap::Error) -> ExitCode {
    if !argv_requests_json(env::args().skip(1)) {
        err.exit();
    }

    let error = match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        ErrorKind::ArgumentConflict => OrigamiError::DuplicateFormat,
        ErrorKind::ValueValidation
        | ErrorKind::InvalidValue
        | ErrorKind::InvalidSubcommand
        | ErrorKind::UnknownArgument
        | ErrorKind::MissingRequiredArgument => OrigamiError::UsageError(err.to_string()),
        _ => OrigamiError::Other(err.to_string()),
    };
    eprintln!("{}", error.to_json());
    exit_with(error.exit_code())
}

/// Print a command failure on stderr in the requested format
fn report(cli: &Cli, error: &OrigamiError) {
    match cli.format {
        OutputFormat::Json => eprintln!("{}", error.to_json()),
        _ if cli.quiet => {}
        _ => eprintln!("error: {}", error),
    }
}

fn exit_with(code: OrigamiExitCode) -> ExitCode {
    ExitCode::from(code as u8)
}

/// True when the raw arguments ask for `--format json`
fn argv_requests_json(args: impl IntoIterator<Item = String>) -> bool {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let requested = match arg.strip_prefix("--format") {
            Some("") => args.next(),
            Some(rest) => rest.strip_prefix('=').map(str::to_string),
            None => None,
        };
        if requested.as_deref() == Some("json") {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::argv_requests_json;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_argv_requests_json_forms() {
        assert!(argv_requests_json(argv(&["--format", "json", "list"])));
        assert!(argv_requests_json(argv(&["list", "--format=json"])));
        assert!(!argv_requests_json(argv(&["--format", "human", "list"])));
        assert!(!argv_requests_json(argv(&["--formatted", "json"])));
        assert!(!argv_requests_json(argv(&["--format"])));
    }
}
