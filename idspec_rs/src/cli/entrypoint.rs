//! Shared CLI entry point: parse, set up logging and config, dispatch,
//! and turn the outcome into an exit code.

use std::io::{self, Write};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use super::command::{Command, GlobalOptions, usage};
use super::dispatch::{DispatchResult, dispatch_command};
use super::parser::parse_command;
use crate::config::IdspecConfig;
use crate::error::{EXIT_UNFORMATTED, EXIT_USAGE, IdspecError};

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "IDSPEC_LOG";

/// Options controlling binary-specific behavior.
pub struct EntryOptions {
    /// Name shown in the synopsis and in `--version` output.
    pub binary_name: &'static str,
}

/// Run the CLI with the process arguments. This is the shared main() body.
pub fn run(opts: &EntryOptions) -> ExitCode {
    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    run_with_args(opts, &raw_args)
}

pub fn run_with_args(opts: &EntryOptions, args: &[String]) -> ExitCode {
    let parsed = match parse_command(args) {
        Ok(parsed) => parsed,
        Err(err) => return report(opts, &err),
    };

    match parsed.command {
        Command::Help => {
            print!("{}", usage(opts.binary_name));
            return ExitCode::SUCCESS;
        }
        Command::Version => {
            println!("{} {}", opts.binary_name, env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    init_logging(&parsed.global);

    let result = IdspecConfig::resolve(parsed.global.config.as_ref()).and_then(|config| {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let result = dispatch_command(&parsed.command, &config, &mut out)?;
        out.flush().map_err(|e| IdspecError::io("<stdout>", e))?;
        Ok(result)
    });

    match result {
        Ok(DispatchResult::Success) => ExitCode::SUCCESS,
        Ok(DispatchResult::Unformatted) => ExitCode::from(EXIT_UNFORMATTED),
        Err(err) => report(opts, &err),
    }
}

/// Install the stderr subscriber. `IDSPEC_LOG` wins over the CLI flags.
fn init_logging(global: &GlobalOptions) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(global.log_level()));
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn report(opts: &EntryOptions, err: &IdspecError) -> ExitCode {
    if is_broken_pipe(err) {
        return ExitCode::SUCCESS;
    }
    if err.is_usage() {
        eprint!("Usage error: {err}\n\n{}", usage(opts.binary_name));
        return ExitCode::from(EXIT_USAGE);
    }
    eprintln!("error: {err}");
    ExitCode::from(err.exit_code())
}

/// Downstream closed stdout (e.g. `| head`); not worth a diagnostic.
fn is_broken_pipe(err: &IdspecError) -> bool {
    matches!(err, IdspecError::Io { source, .. } if source.kind() == io::ErrorKind::BrokenPipe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_pipe_is_not_an_error() {
        let err = IdspecError::io("<stdout>", io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(is_broken_pipe(&err));
        let err = IdspecError::io("a.id", io::Error::from(io::ErrorKind::NotFound));
        assert!(!is_broken_pipe(&err));
    }
}
