//! Route a parsed command to its handler.

use std::io::Write;
use std::path::{Path, PathBuf};

use idspec_dsl::GenOptions;

use super::command::{Command, FmtArgs};
use crate::config::{CONFIG_FILE_NAME, IdspecConfig};
use crate::error::Result;
use crate::formatter::{FmtSettings, FmtTarget, run_fmt};
use crate::fs_utils::PathSpec;
use crate::generate::{GenSettings, run_gen};
use crate::methods::run_methods_json;
use crate::symbols::run_sym;

/// How a successfully dispatched command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    Success,
    /// `fmt --check` found files that are not canonical.
    Unformatted,
}

/// Run `command`, writing its stdout payload to `out`.
///
/// `Help` and `Version` never reach this point; the entry point answers
/// them before loading any config.
pub fn dispatch_command<W: Write>(
    command: &Command,
    config: &IdspecConfig,
    out: &mut W,
) -> Result<DispatchResult> {
    tracing::debug!(command = command.name(), "dispatch");
    match command {
        Command::Gen(args) => {
            let settings = GenSettings {
                options: GenOptions {
                    header: config.generate.header,
                },
                file_mode: config.fmt.file_mode,
            };
            run_gen(&args.src, &args.dst, &settings)?;
            Ok(DispatchResult::Success)
        }
        Command::Fmt(args) => {
            let targets = fmt_targets(args, config)?;
            let settings = FmtSettings {
                file_mode: config.fmt.file_mode,
                check: args.check,
            };
            let summary = run_fmt(&targets, &settings, out)?;
            if summary.unformatted > 0 {
                Ok(DispatchResult::Unformatted)
            } else {
                Ok(DispatchResult::Success)
            }
        }
        Command::Sym(args) => {
            run_sym(&args.src, &args.symbols, out)?;
            Ok(DispatchResult::Success)
        }
        Command::MethodsJson(args) => {
            let files = resolve(&args.src, config)?;
            run_methods_json(&files, out)?;
            Ok(DispatchResult::Success)
        }
        Command::Help | Command::Version => {
            unreachable!("{} is answered by the entry point", command.name())
        }
    }
}

fn fmt_targets(args: &FmtArgs, config: &IdspecConfig) -> Result<Vec<FmtTarget>> {
    match (&args.src, &args.dst) {
        (PathSpec::File(src), Some(dst)) => Ok(vec![FmtTarget {
            src: src.clone(),
            dst: dst.clone(),
        }]),
        (PathSpec::Recursive(_), Some(_)) => {
            unreachable!("parser only pairs a destination with a single file")
        }
        (src, None) => Ok(resolve(src, config)?
            .into_iter()
            .map(FmtTarget::in_place)
            .collect()),
    }
}

fn resolve(spec: &PathSpec, config: &IdspecConfig) -> Result<Vec<PathBuf>> {
    tracing::debug!(%spec, "resolving path spec");
    let exclude = config.walk.exclude_set(Path::new(CONFIG_FILE_NAME))?;
    spec.resolve(exclude.as_ref())
}
