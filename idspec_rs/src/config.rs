//! Configuration file support for idspec.
//!
//! Loads optional `idspec.toml` from the working directory, or the file
//! given with `--config`.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;

use crate::error::{IdspecError, Result};

pub const CONFIG_FILE_NAME: &str = "idspec.toml";

/// Default mode for files written by `fmt` and `gen`.
pub const DEFAULT_FILE_MODE: u32 = 0o777;

/// Root configuration structure
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct IdspecConfig {
    pub walk: WalkConfig,
    pub fmt: FmtConfig,
    #[serde(rename = "gen")]
    pub generate: GenConfig,
}

/// Directory traversal for `<dir>/...` path specs.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Glob patterns matched against paths relative to the walk root.
    /// Example: `["vendor/**", "**/*_old.id"]`
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FmtConfig {
    /// Unix permission bits for written files.
    pub file_mode: u32,
}

impl Default for FmtConfig {
    fn default() -> Self {
        Self {
            file_mode: DEFAULT_FILE_MODE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Emit the "Code generated ... DO NOT EDIT." header.
    pub header: bool,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self { header: true }
    }
}

impl IdspecConfig {
    /// Load `idspec.toml` from `root`.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load_from_path(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("ignoring {}: {}", config_path.display(), err);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path. Missing or invalid files are errors.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| IdspecError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| IdspecError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        // Surface bad globs at load time rather than mid-walk.
        config.walk.exclude_set(path)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Resolve the config for an invocation: explicit path if given,
    /// otherwise the working directory's `idspec.toml`.
    pub fn resolve(explicit: Option<&PathBuf>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_path(path),
            None => Ok(Self::load(Path::new("."))),
        }
    }
}

impl WalkConfig {
    /// Build a globset from the exclude patterns; `None` when there are none.
    pub fn exclude_set(&self, origin: &Path) -> Result<Option<GlobSet>> {
        let mut builder = GlobSetBuilder::new();
        let mut added = false;
        for pattern in &self.exclude {
            if pattern.trim().is_empty() {
                continue;
            }
            let glob = Glob::new(pattern).map_err(|e| IdspecError::Config {
                path: origin.to_path_buf(),
                message: format!("invalid exclude glob '{pattern}': {e}"),
            })?;
            builder.add(glob);
            added = true;
        }
        if !added {
            return Ok(None);
        }
        builder.build().map(Some).map_err(|e| IdspecError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = IdspecConfig::default();
        assert!(config.walk.exclude.is_empty());
        assert_eq!(config.fmt.file_mode, 0o777);
        assert!(config.generate.header);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().expect("temp dir");
        let config = IdspecConfig::load(temp.path());
        assert_eq!(config.fmt.file_mode, DEFAULT_FILE_MODE);
    }

    #[test]
    fn test_load_valid_config() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[walk]\nexclude = [\"vendor/**\"]\n\n[fmt]\nfile_mode = 0o644\n\n[gen]\nheader = false\n",
        )
        .expect("write config");

        let config = IdspecConfig::load(temp.path());
        assert_eq!(config.walk.exclude, vec!["vendor/**".to_string()]);
        assert_eq!(config.fmt.file_mode, 0o644);
        assert!(!config.generate.header);
    }

    #[test]
    fn test_invalid_default_config_falls_back() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "[fmt\nbroken").expect("write");
        let config = IdspecConfig::load(temp.path());
        assert_eq!(config.fmt.file_mode, DEFAULT_FILE_MODE);
    }

    #[test]
    fn test_explicit_config_errors_are_fatal() {
        let temp = TempDir::new().expect("temp dir");
        let missing = temp.path().join("nope.toml");
        let err = IdspecConfig::load_from_path(&missing).expect_err("missing file");
        assert!(matches!(err, IdspecError::Config { .. }));

        let bad_glob = temp.path().join("bad.toml");
        std::fs::write(&bad_glob, "[walk]\nexclude = [\"a/[\"]\n").expect("write");
        let err = IdspecConfig::load_from_path(&bad_glob).expect_err("bad glob");
        assert!(err.to_string().contains("invalid exclude glob"));
    }
}
