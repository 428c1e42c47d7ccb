//! Error types for the `.id` toolchain.
//!
//! Uses `thiserror` so the CLI crate can wrap both error kinds with path
//! context without losing the original message.

use thiserror::Error;

/// A syntax error with a 1-based source location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    /// Build an error for the byte `offset` of `src`.
    pub(crate) fn at(src: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(src.len());
        let before = &src[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Semantic errors found while generating Go code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("duplicate declaration `{0}`")]
    DuplicateDecl(String),

    #[error("duplicate member `{member}` in `{decl}`")]
    DuplicateMember { decl: String, member: String },

    #[error("union `{0}` declares no cases")]
    EmptyUnion(String),

    #[error("invalid map key `{key}` in `{decl}`: keys must be named types")]
    InvalidMapKey { decl: String, key: String },

    #[error("`{decl}` references `{package}`, which is not imported")]
    UnknownImport { decl: String, package: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_is_one_based() {
        let src = "type A Int\ntype B {";
        let err = ParseError::at(src, src.len(), "expected type");
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 9);
        assert_eq!(err.to_string(), "line 2, column 9: expected type");
    }

    #[test]
    fn location_at_start_of_file() {
        let err = ParseError::at("x", 0, "boom");
        assert_eq!((err.line, err.column), (1, 1));
    }
}
