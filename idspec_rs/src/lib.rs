//! # idspec
//!
//! Command-line toolchain for `.id` interface specs: compile them to Go,
//! format them canonically, print selected declarations and export method
//! prototypes as JSON.
//!
//! The language itself (parser, renderer, generator) lives in
//! [`idspec_dsl`]; this crate handles argument validation, path-spec
//! expansion and the per-file pipelines.
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use idspec::fs_utils::PathSpec;
//! use idspec::methods::run_methods_json;
//!
//! let files = PathSpec::parse("specs/...")?.resolve(None)?;
//! run_methods_json(&files, &mut std::io::stdout())?;
//! # Ok::<(), idspec::IdspecError>(())
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! idspec gen chain/block.id chain/block.gen.go
//! idspec fmt specs/...
//! idspec sym chain/block.id Block Epoch
//! idspec methods-json specs/...
//! ```

// ============================================================================
// Core Modules
// ============================================================================

/// Path specs (`file.id`, `dir/...`) and spec-file discovery.
pub mod fs_utils;

/// Reading and parsing one spec file.
pub mod source;

/// `fmt`: canonical formatting with write suppression.
pub mod formatter;

/// `sym`: declaration lookup and printing.
pub mod symbols;

/// `methods-json`: method prototype export.
pub mod methods;

/// `gen`: Go code generation driver.
pub mod generate;

// ============================================================================
// Infrastructure
// ============================================================================

pub mod cli;
pub mod config;
pub mod error;

pub use config::IdspecConfig;
pub use error::{IdspecError, Result};
