//! The `fmt` pipeline: make files match their canonical rendering,
//! writing only when the bytes differ.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{IdspecError, Result};
use crate::fs_utils::write_file;
use crate::source::SourceFile;

#[derive(Debug, Clone)]
pub struct FmtSettings {
    /// Unix mode for written files.
    pub file_mode: u32,
    /// Report non-canonical files instead of rewriting them.
    pub check: bool,
}

/// One source file and where its canonical form belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmtTarget {
    pub src: PathBuf,
    pub dst: PathBuf,
}

impl FmtTarget {
    pub fn in_place(path: PathBuf) -> Self {
        Self {
            dst: path.clone(),
            src: path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FmtOutcome {
    /// Target already canonical; nothing touched.
    Unchanged,
    /// Target rewritten.
    Written,
    /// Target not canonical (check mode only).
    Unformatted,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FmtSummary {
    pub unchanged: usize,
    pub written: usize,
    pub unformatted: usize,
}

/// Format one file into its target.
pub fn format_file(target: &FmtTarget, settings: &FmtSettings) -> Result<FmtOutcome> {
    let source = SourceFile::load(&target.src)?;
    let rendered = idspec_dsl::render(&source.module);

    let unchanged = if target.dst == target.src {
        source.text == rendered
    } else {
        match fs::read(&target.dst) {
            Ok(current) => current == rendered.as_bytes(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => false,
            Err(err) => return Err(IdspecError::io(&target.dst, err)),
        }
    };

    if unchanged {
        tracing::debug!(path = %target.dst.display(), "already canonical");
        return Ok(FmtOutcome::Unchanged);
    }
    if settings.check {
        return Ok(FmtOutcome::Unformatted);
    }
    write_file(&target.dst, rendered.as_bytes(), settings.file_mode)?;
    Ok(FmtOutcome::Written)
}

/// Format every target in order, printing each written (or, in check mode,
/// each non-canonical) path. Stops at the first error; earlier writes stay.
pub fn run_fmt<W: Write>(
    targets: &[FmtTarget],
    settings: &FmtSettings,
    out: &mut W,
) -> Result<FmtSummary> {
    let mut summary = FmtSummary::default();
    for target in targets {
        match format_file(target, settings)? {
            FmtOutcome::Unchanged => summary.unchanged += 1,
            FmtOutcome::Written => {
                summary.written += 1;
                report(out, &target.dst)?;
            }
            FmtOutcome::Unformatted => {
                summary.unformatted += 1;
                report(out, &target.dst)?;
            }
        }
    }
    tracing::debug!(
        written = summary.written,
        unchanged = summary.unchanged,
        unformatted = summary.unformatted,
        "fmt finished"
    );
    Ok(summary)
}

fn report<W: Write>(out: &mut W, path: &Path) -> Result<()> {
    writeln!(out, "{}", path.display()).map_err(|e| IdspecError::io("<stdout>", e))
}
