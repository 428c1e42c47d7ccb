//! Error taxonomy for the idspec CLI.
//!
//! Every recoverable failure travels up to the entry point as an
//! [`IdspecError`]; the entry point turns it into one stderr line and an
//! exit code. Programming faults panic instead.

use std::io;
use std::path::{Path, PathBuf};

use idspec_dsl::{CompileError, ParseError};
use thiserror::Error;

/// Malformed invocation. Printed with the synopsis.
pub const EXIT_USAGE: u8 = 1;
/// Parse, compile, lookup, I/O, config or JSON failure.
pub const EXIT_FAILURE: u8 = 2;
/// `fmt --check` found non-canonical files.
pub const EXIT_UNFORMATTED: u8 = 3;

pub type Result<T, E = IdspecError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum IdspecError {
    #[error("{0}")]
    Usage(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("{}: {source}", path.display())]
    Parse { path: PathBuf, source: ParseError },

    #[error("{}: {source}", path.display())]
    Compile { path: PathBuf, source: CompileError },

    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl IdspecError {
    pub fn usage(message: impl Into<String>) -> Self {
        IdspecError::Usage(message.into())
    }

    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        IdspecError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, IdspecError::Usage(_))
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            IdspecError::Usage(_) => EXIT_USAGE,
            IdspecError::SymbolNotFound { .. }
            | IdspecError::Parse { .. }
            | IdspecError::Compile { .. }
            | IdspecError::Io { .. }
            | IdspecError::Config { .. }
            | IdspecError::Json(_) => EXIT_FAILURE,
        }
    }
}
