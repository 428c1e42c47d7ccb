//! Loading spec files into parsed modules.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use idspec_dsl::Module;

use crate::error::{IdspecError, Result};

/// A spec file read once from disk, with its parsed module.
///
/// `text` is the exact snapshot the module was parsed from, so callers can
/// compare against it without reading the file again.
#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
    pub module: Module,
}

impl SourceFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_text(path)?;
        let module = idspec_dsl::parse(&text).map_err(|source| IdspecError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), decls = module.decls().len(), "parsed");
        Ok(Self {
            path: path.to_path_buf(),
            text,
            module,
        })
    }
}

/// Read a file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| IdspecError::io(path, e))?;
    String::from_utf8(bytes).map_err(|e| {
        IdspecError::io(
            path,
            io::Error::new(io::ErrorKind::InvalidData, format!("not valid UTF-8: {e}")),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_and_parses() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let path = tmp.path().join("a.id");
        fs::write(&path, "type  A   int\n").expect("write");

        let source = SourceFile::load(&path).expect("load");
        assert_eq!(source.text, "type  A   int\n");
        assert_eq!(source.module.decls()[0].name(), "A");
    }

    #[test]
    fn parse_errors_keep_path_and_location() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let path = tmp.path().join("bad.id");
        fs::write(&path, "type A struct {\n    B\n}\n").expect("write");

        let err = SourceFile::load(&path).expect_err("parse error");
        let message = err.to_string();
        assert!(matches!(err, IdspecError::Parse { .. }));
        assert!(message.contains("bad.id"));
        assert!(message.contains("line 3, column 1"));
    }

    #[test]
    fn missing_and_binary_files_are_io_errors() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let err = SourceFile::load(&tmp.path().join("absent.id")).expect_err("missing");
        assert!(matches!(err, IdspecError::Io { .. }));

        let path = tmp.path().join("bin.id");
        fs::write(&path, [0xff, 0xfe, 0x00]).expect("write");
        let err = SourceFile::load(&path).expect_err("binary");
        assert!(err.to_string().contains("not valid UTF-8"));
    }
}
