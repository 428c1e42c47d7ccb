//! Command-line front end for `idspec <command> [args]`.
//!
//! ```text
//! argv ──► parser ──► ParsedCommand ──► entrypoint ──► dispatch ──► handlers
//!            │                             │
//!            └── Usage error (exit 1)      └── logging, config, exit codes
//! ```
//!
//! # Module Structure
//!
//! - [`command`] - Command enum, per-command arguments, synopsis text
//! - [`parser`] - Global options and per-command arity checks
//! - [`dispatch`] - Routes a command to its handler
//! - [`entrypoint`] - Shared `main()` body

pub mod command;
pub mod dispatch;
pub mod entrypoint;
pub mod parser;

pub use command::{
    Command, FmtArgs, GenArgs, GlobalOptions, MethodsJsonArgs, ParsedCommand, SymArgs, usage,
};
pub use dispatch::{DispatchResult, dispatch_command};
pub use parser::parse_command;
