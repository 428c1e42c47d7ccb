//! Package-name derivation from spec file paths.

use std::path::Path;

use heck::ToSnakeCase;

/// Derive the Go package name for a spec file from its path.
///
/// Uses the parent directory name, or the file stem when the path has no
/// named parent (`actor.id`, `./actor.id`).
pub fn package_name(path: &Path) -> String {
    let raw = path
        .parent()
        .and_then(Path::file_name)
        .or_else(|| path.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    sanitize(&raw)
}

fn sanitize(raw: &str) -> String {
    let mut name: String = raw
        .to_snake_case()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if name.is_empty() {
        return "main".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}
