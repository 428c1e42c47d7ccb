//! Argument parsing: global options, command name, per-command arity.
//!
//! Every rejection is an [`IdspecError::Usage`]; the entry point prints it
//! together with the synopsis.

use std::path::PathBuf;

use strsim::levenshtein;

use super::command::{
    COMMANDS, Command, FmtArgs, GenArgs, GlobalOptions, MethodsJsonArgs, ParsedCommand, SymArgs,
};
use crate::error::{IdspecError, Result};
use crate::fs_utils::PathSpec;

/// Parse command-line arguments (without argv[0]).
pub fn parse_command(args: &[String]) -> Result<ParsedCommand> {
    let mut global = GlobalOptions::default();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--verbose" | "-v" => global.verbose = true,
            "--quiet" | "-q" => global.quiet = true,
            "--help" | "-h" => return Ok(ParsedCommand::new(Command::Help, global)),
            "--version" | "-V" => return Ok(ParsedCommand::new(Command::Version, global)),
            "--config" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| IdspecError::usage("--config requires a path"))?;
                global.config = Some(PathBuf::from(value));
                i += 1;
            }
            _ if arg.starts_with("--config=") => {
                let value = &arg["--config=".len()..];
                if value.is_empty() {
                    return Err(IdspecError::usage("--config requires a path"));
                }
                global.config = Some(PathBuf::from(value));
            }
            _ if is_option(arg) => {
                return Err(IdspecError::usage(format!("unknown option: {arg}")));
            }
            _ => break,
        }
        i += 1;
    }

    let Some(name) = args.get(i) else {
        return Err(IdspecError::usage("missing command"));
    };
    let rest = &args[i + 1..];

    if rest.iter().any(|a| a == "--help" || a == "-h") {
        return Ok(ParsedCommand::new(Command::Help, global));
    }

    let command = match name.as_str() {
        "gen" => parse_gen_command(rest)?,
        "fmt" => parse_fmt_command(rest)?,
        "sym" => parse_sym_command(rest)?,
        "methods-json" => parse_methods_json_command(rest)?,
        "help" => Command::Help,
        other => return Err(unknown_command(other)),
    };
    Ok(ParsedCommand::new(command, global))
}

fn parse_gen_command(args: &[String]) -> Result<Command> {
    let positional = positionals(args, "gen", &[])?;
    let [src, dst] = positional.as_slice() else {
        return Err(IdspecError::usage(
            "gen command requires exactly two arguments",
        ));
    };
    Ok(Command::Gen(GenArgs {
        src: PathSpec::parse_single(src, "gen")?,
        dst: PathBuf::from(dst),
    }))
}

fn parse_fmt_command(args: &[String]) -> Result<Command> {
    let check = args.iter().any(|a| a == "--check");
    let positional = positionals(args, "fmt", &["--check"])?;
    match positional.as_slice() {
        [src] => Ok(Command::Fmt(FmtArgs {
            src: PathSpec::parse(src)?,
            dst: None,
            check,
        })),
        [src, dst] => {
            if check {
                return Err(IdspecError::usage(
                    "fmt --check cannot be combined with a destination",
                ));
            }
            let src = PathSpec::parse_single(src, "fmt with a destination")?;
            Ok(Command::Fmt(FmtArgs {
                src: PathSpec::File(src),
                dst: Some(PathBuf::from(dst)),
                check,
            }))
        }
        _ => Err(IdspecError::usage(
            "fmt command requires one or two arguments",
        )),
    }
}

fn parse_sym_command(args: &[String]) -> Result<Command> {
    let positional = positionals(args, "sym", &[])?;
    let Some((src, symbols)) = positional.split_first().filter(|(_, s)| !s.is_empty()) else {
        return Err(IdspecError::usage(
            "sym command requires a file and at least one symbol",
        ));
    };
    Ok(Command::Sym(SymArgs {
        src: PathSpec::parse_single(src, "sym")?,
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
    }))
}

fn parse_methods_json_command(args: &[String]) -> Result<Command> {
    let positional = positionals(args, "methods-json", &[])?;
    let [src] = positional.as_slice() else {
        return Err(IdspecError::usage(
            "methods-json command requires exactly one argument",
        ));
    };
    Ok(Command::MethodsJson(MethodsJsonArgs {
        src: PathSpec::parse(src)?,
    }))
}

/// Split off positional arguments, rejecting options the command does not know.
fn positionals<'a>(args: &'a [String], command: &str, known: &[&str]) -> Result<Vec<&'a str>> {
    let mut positional = Vec::with_capacity(args.len());
    for arg in args {
        if known.contains(&arg.as_str()) {
            continue;
        }
        if is_option(arg) {
            return Err(IdspecError::usage(format!(
                "unknown option for {command}: {arg}"
            )));
        }
        positional.push(arg.as_str());
    }
    Ok(positional)
}

fn is_option(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with('-')
}

fn unknown_command(input: &str) -> IdspecError {
    match suggest_similar_command(input) {
        Some(suggestion) => IdspecError::usage(format!(
            "unknown command: \"{input}\" (did you mean \"{suggestion}\"?)"
        )),
        None => IdspecError::usage(format!("unknown command: \"{input}\"")),
    }
}

/// Closest known command within edit distance 2.
fn suggest_similar_command(input: &str) -> Option<&'static str> {
    let input = input.to_lowercase();
    COMMANDS
        .iter()
        .map(|&cmd| (cmd, levenshtein(&input, cmd)))
        .filter(|&(_, distance)| distance <= 2)
        .min_by_key(|&(_, distance)| distance)
        .map(|(cmd, _)| cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ParsedCommand> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        parse_command(&args)
    }

    fn usage_message(args: &[&str]) -> String {
        let err = parse(args).expect_err("usage error");
        assert!(err.is_usage(), "{err:?}");
        err.to_string()
    }

    #[test]
    fn gen_takes_exactly_two() {
        let parsed = parse(&["gen", "a/b.id", "a/b.go"]).expect("gen");
        assert_eq!(
            parsed.command,
            Command::Gen(GenArgs {
                src: PathBuf::from("a/b.id"),
                dst: PathBuf::from("a/b.go"),
            })
        );
        for args in [&["gen", "a.id"][..], &["gen", "a.id", "b.go", "c.go"][..]] {
            assert_eq!(
                usage_message(args),
                "gen command requires exactly two arguments"
            );
        }
    }

    #[test]
    fn fmt_accepts_one_or_two() {
        let parsed = parse(&["fmt", "specs/..."]).expect("fmt");
        assert_eq!(
            parsed.command,
            Command::Fmt(FmtArgs {
                src: PathSpec::Recursive(PathBuf::from("specs")),
                dst: None,
                check: false,
            })
        );

        let parsed = parse(&["fmt", "a.id", "b.id"]).expect("fmt two");
        let Command::Fmt(args) = parsed.command else {
            panic!("expected fmt");
        };
        assert_eq!(args.dst, Some(PathBuf::from("b.id")));

        assert_eq!(
            usage_message(&["fmt"]),
            "fmt command requires one or two arguments"
        );
        assert_eq!(
            usage_message(&["fmt", "a.id", "b.id", "c.id"]),
            "fmt command requires one or two arguments"
        );
    }

    #[test]
    fn fmt_destination_needs_a_single_file() {
        let message = usage_message(&["fmt", "specs/...", "out.id"]);
        assert!(message.contains("takes a single .id file"), "{message}");
    }

    #[test]
    fn fmt_check_flag() {
        let parsed = parse(&["fmt", "--check", "a/..."]).expect("check");
        let Command::Fmt(args) = parsed.command else {
            panic!("expected fmt");
        };
        assert!(args.check);
        assert_eq!(
            usage_message(&["fmt", "--check", "a.id", "b.id"]),
            "fmt --check cannot be combined with a destination"
        );
        assert_eq!(
            usage_message(&["sym", "--check", "a.id", "A"]),
            "unknown option for sym: --check"
        );
    }

    #[test]
    fn sym_needs_at_least_one_symbol() {
        let parsed = parse(&["sym", "a.id", "B", "A"]).expect("sym");
        assert_eq!(
            parsed.command,
            Command::Sym(SymArgs {
                src: PathBuf::from("a.id"),
                symbols: vec!["B".to_string(), "A".to_string()],
            })
        );
        assert_eq!(
            usage_message(&["sym", "a.id"]),
            "sym command requires a file and at least one symbol"
        );
        assert!(usage_message(&["sym", "a/...", "A"]).contains("sym takes a single .id file"));
    }

    #[test]
    fn methods_json_takes_exactly_one() {
        assert!(parse(&["methods-json", "a/..."]).is_ok());
        for args in [&["methods-json"][..], &["methods-json", "a.id", "b.id"][..]] {
            assert_eq!(
                usage_message(args),
                "methods-json command requires exactly one argument"
            );
        }
    }

    #[test]
    fn bad_path_specs_are_usage_errors() {
        assert_eq!(
            usage_message(&["methods-json", "specs"]),
            "Unsupported input path spec: \"specs\""
        );
    }

    #[test]
    fn global_options_come_before_the_command() {
        let parsed = parse(&["-v", "--config", "ci.toml", "fmt", "a.id"]).expect("globals");
        assert!(parsed.global.verbose);
        assert_eq!(parsed.global.config, Some(PathBuf::from("ci.toml")));

        let parsed = parse(&["-q", "--config=x.toml", "fmt", "a.id"]).expect("globals");
        assert!(parsed.global.quiet);
        assert_eq!(parsed.global.config, Some(PathBuf::from("x.toml")));

        assert_eq!(usage_message(&["--config"]), "--config requires a path");
        assert_eq!(usage_message(&["--json", "fmt", "a.id"]), "unknown option: --json");
    }

    #[test]
    fn help_and_version() {
        assert_eq!(usage_message(&[]), "missing command");
        assert_eq!(parse(&["--help"]).expect("help").command, Command::Help);
        assert_eq!(parse(&["help"]).expect("help").command, Command::Help);
        assert_eq!(parse(&["fmt", "-h"]).expect("help").command, Command::Help);
        assert_eq!(parse(&["-V"]).expect("version").command, Command::Version);
    }

    #[test]
    fn unknown_commands_get_suggestions() {
        assert_eq!(
            usage_message(&["fnt", "a.id"]),
            "unknown command: \"fnt\" (did you mean \"fmt\"?)"
        );
        assert_eq!(
            usage_message(&["methods", "a.id"]),
            "unknown command: \"methods\""
        );
    }
}
