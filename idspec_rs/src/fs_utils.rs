//! Path-spec resolution and spec-file discovery.
//!
//! A path spec is either one `.id` file or `<dir>/...`, meaning every spec
//! file under `<dir>`. Traversal is a lazy walkdir iterator; pruning and
//! filtering are separate predicates applied to it.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use globset::GlobSet;
use walkdir::{DirEntry, WalkDir};

use crate::error::{IdspecError, Result};

/// Extension of spec files, without the dot.
pub const SPEC_EXTENSION: &str = "id";

/// Suffix marking a recursive directory spec.
pub const RECURSIVE_MARKER: &str = "/...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSpec {
    /// A single spec file.
    File(PathBuf),
    /// Every spec file under this directory.
    Recursive(PathBuf),
}

impl PathSpec {
    pub fn parse(raw: &str) -> Result<Self> {
        if let Some(dir) = raw.strip_suffix(RECURSIVE_MARKER) {
            let dir = if dir.is_empty() { "/" } else { dir };
            return Ok(PathSpec::Recursive(PathBuf::from(dir)));
        }
        if raw.ends_with(".id") {
            return Ok(PathSpec::File(PathBuf::from(raw)));
        }
        Err(IdspecError::usage(format!(
            "Unsupported input path spec: \"{raw}\""
        )))
    }

    /// Parse a spec that must name exactly one file.
    pub fn parse_single(raw: &str, command: &str) -> Result<PathBuf> {
        match Self::parse(raw)? {
            PathSpec::File(path) => Ok(path),
            PathSpec::Recursive(_) => Err(IdspecError::usage(format!(
                "{command} takes a single .id file, not \"{raw}\""
            ))),
        }
    }

    /// Expand into concrete files, in deterministic order.
    pub fn resolve(&self, exclude: Option<&GlobSet>) -> Result<Vec<PathBuf>> {
        match self {
            PathSpec::File(path) => Ok(vec![path.clone()]),
            PathSpec::Recursive(root) => {
                let files = spec_files(root, exclude).collect::<Result<Vec<_>>>()?;
                tracing::debug!(root = %root.display(), count = files.len(), "resolved spec files");
                Ok(files)
            }
        }
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSpec::File(path) => write!(f, "{}", path.display()),
            PathSpec::Recursive(root) => write!(f, "{}{}", root.display(), RECURSIVE_MARKER),
        }
    }
}

/// Lazily walk `root` and yield spec files, file names sorted per level.
///
/// Hidden directories (`.name`, but not `.` itself) are pruned with their
/// subtree. The walk root is never pruned. Only regular files are yielded;
/// symlinks are not followed.
pub fn spec_files<'a>(
    root: &'a Path,
    exclude: Option<&'a GlobSet>,
) -> impl Iterator<Item = Result<PathBuf>> + 'a {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden_dir(entry))
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                if is_spec_file(&entry) && !is_excluded(root, entry.path(), exclude) {
                    Some(Ok(entry.into_path()))
                } else {
                    None
                }
            }
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                Some(Err(IdspecError::io(path, err.into())))
            }
        })
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') && name.len() > 1
}

fn is_spec_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry
            .path()
            .extension()
            .is_some_and(|ext| ext == SPEC_EXTENSION)
}

fn is_excluded(root: &Path, path: &Path, exclude: Option<&GlobSet>) -> bool {
    match exclude {
        None => false,
        Some(set) => set.is_match(path.strip_prefix(root).unwrap_or(path)),
    }
}

/// Create or truncate `path` and write `contents`. `mode` sets the Unix
/// permission bits of newly created files.
pub fn write_file(path: &Path, contents: &[u8], mode: u32) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = options.open(path).map_err(|e| IdspecError::io(path, e))?;
    file.write_all(contents).map_err(|e| IdspecError::io(path, e))?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}
