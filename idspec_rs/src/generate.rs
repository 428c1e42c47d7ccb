//! The `gen` command: compile one spec file into Go source.

use std::path::Path;

use idspec_dsl::GenOptions;

use crate::error::{IdspecError, Result};
use crate::fs_utils::write_file;
use crate::source::SourceFile;

#[derive(Debug, Clone)]
pub struct GenSettings {
    pub options: GenOptions,
    /// Unix mode for the generated file.
    pub file_mode: u32,
}

/// Compile `src` in the package context derived from its path.
pub fn compile_file(src: &Path, options: &GenOptions) -> Result<String> {
    let source = SourceFile::load(src)?;
    let package = idspec_dsl::package_name(src);
    tracing::debug!(path = %src.display(), %package, "compiling");
    idspec_dsl::compile_with(&source.module, &package, options).map_err(|source| {
        IdspecError::Compile {
            path: src.to_path_buf(),
            source,
        }
    })
}

/// Run `gen <src> <dst>`. The destination is only touched after a
/// successful compile.
pub fn run_gen(src: &Path, dst: &Path, settings: &GenSettings) -> Result<()> {
    let go = compile_file(src, &settings.options)?;
    write_file(dst, go.as_bytes(), settings.file_mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn settings(header: bool) -> GenSettings {
        GenSettings {
            options: GenOptions { header },
            file_mode: 0o644,
        }
    }

    #[test]
    fn package_comes_from_the_parent_directory() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let dir = tmp.path().join("FilecoinVM");
        fs::create_dir_all(&dir).expect("mkdir");
        let src = dir.join("actor.id");
        let dst = tmp.path().join("actor.go");
        fs::write(&src, "type Epoch int\n").expect("write");

        run_gen(&src, &dst, &settings(false)).expect("gen");
        let go = fs::read_to_string(&dst).expect("read");
        assert!(go.starts_with("package filecoin_vm\n"), "{go}");
        assert!(go.contains("type Epoch int\n"));
    }

    #[test]
    fn header_follows_settings() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let src = tmp.path().join("a.id");
        fs::write(&src, "type A int\n").expect("write");

        let with = compile_file(&src, &GenOptions { header: true }).expect("compile");
        assert!(with.starts_with("// Code generated by idspec. DO NOT EDIT.\n\n"));
        let without = compile_file(&src, &GenOptions { header: false }).expect("compile");
        assert!(without.starts_with("package "));
    }

    #[test]
    fn compile_errors_leave_destination_untouched() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let src = tmp.path().join("a.id");
        let dst = tmp.path().join("a.go");
        fs::write(&src, "type A int\ntype A bool\n").expect("write");

        let err = run_gen(&src, &dst, &settings(true)).expect_err("duplicate");
        assert!(matches!(err, IdspecError::Compile { .. }));
        assert!(err.to_string().contains("a.id"));
        assert!(!dst.exists());
    }

    #[test]
    fn parse_errors_are_reported_as_parse() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let src = tmp.path().join("a.id");
        fs::write(&src, "type A struct {").expect("write");

        let err = run_gen(&src, &tmp.path().join("a.go"), &settings(true)).expect_err("parse");
        assert!(matches!(err, IdspecError::Parse { .. }));
    }
}
