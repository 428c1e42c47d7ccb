//! Command types produced by the parser and consumed by dispatch.

use std::path::PathBuf;

use crate::fs_utils::PathSpec;

/// Known command names, in synopsis order.
pub(crate) const COMMANDS: &[&str] = &["gen", "fmt", "sym", "methods-json", "help"];

const SYNOPSIS: &str = "SYNOPSIS
    {bin} [options] <command> <args...>

COMMANDS
    gen <idsrc> <goout>          parse <idsrc>, compile it, and write the generated Go code to <goout>
    fmt [--check] <idsrc>        format <idsrc> in place; <idsrc> may be <dir>/... for every .id file below <dir>
    fmt <idsrc> <idout>          format <idsrc> and write the result to <idout>
    sym <idsrc> SYM1 [SYM2 ...]  parse <idsrc> and print the given declarations to stdout
    methods-json <idsrc>         print a JSON listing of the struct/union method prototypes in <idsrc>
    help                         show this text

OPTIONS
    -v, --verbose                debug logging on stderr
    -q, --quiet                  errors only
        --config <path>          read settings from <path> instead of ./idspec.toml
    -h, --help                   show this text
    -V, --version                print the version

    IDSPEC_LOG overrides the log filter (e.g. IDSPEC_LOG=idspec=trace).

EXAMPLES
    # compile file.id to file.gen.go
    {bin} gen a/b/file.id a/b/file.gen.go

    # format file.id, then every .id file under a/
    {bin} fmt a/b/file.id
    {bin} fmt a/...

    # report unformatted files without touching them
    {bin} fmt --check a/...

    # format file.id to file2.id
    {bin} fmt a/b/file.id a/b/file2.id

    # print two declarations of file.id
    {bin} sym a/b/file.id Block Epoch

    # JSON listing of the methods defined under a/
    {bin} methods-json a/...
";

/// Synopsis text with the binary name filled in.
pub fn usage(binary_name: &str) -> String {
    SYNOPSIS.replace("{bin}", binary_name)
}

/// A validated invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Gen(GenArgs),
    Fmt(FmtArgs),
    Sym(SymArgs),
    MethodsJson(MethodsJsonArgs),
    Help,
    Version,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Gen(_) => "gen",
            Command::Fmt(_) => "fmt",
            Command::Sym(_) => "sym",
            Command::MethodsJson(_) => "methods-json",
            Command::Help => "help",
            Command::Version => "version",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenArgs {
    pub src: PathBuf,
    pub dst: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmtArgs {
    pub src: PathSpec,
    /// Explicit destination; only valid with a single-file source.
    pub dst: Option<PathBuf>,
    pub check: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymArgs {
    pub src: PathBuf,
    pub symbols: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodsJsonArgs {
    pub src: PathSpec,
}

/// Options accepted before the command name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    /// Debug-level logging
    pub verbose: bool,

    /// Errors only
    pub quiet: bool,

    /// Explicit config file (--config)
    pub config: Option<PathBuf>,
}

impl GlobalOptions {
    /// Default log filter when `IDSPEC_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

/// Result of parsing command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: Command,
    pub global: GlobalOptions,
}

impl ParsedCommand {
    pub fn new(command: Command, global: GlobalOptions) -> Self {
        Self { command, global }
    }
}
