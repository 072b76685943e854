//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Copy a file, creating parent directories of `dst` if needed.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        ensure_dir(parent)?;
    }
    fs::copy(src, dst).with_context(|| {
        format!("failed to copy {} to {}", src.display(), dst.display())
    })?;
    Ok(())
}

/// Recursively find files under `base` whose extension is one of
/// `extensions` (compared case-insensitively).
///
/// The result is sorted so that scans are deterministic across platforms.
/// A missing `base` yields an empty list.
pub fn find_files(base: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    if !base.is_dir() {
        return Ok(Vec::new());
    }

    let mut results = Vec::new();
    for entry in WalkDir::new(base).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("walk error under {}: {}", base.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)));

        if matches {
            results.push(entry.into_path());
        }
    }

    results.sort();
    Ok(results)
}

/// List the immediate subdirectories of `dir`, sorted by name.
pub fn list_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut dirs = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Canonicalize a path, but don't fail if it doesn't exist yet.
/// Returns the path as-is if canonicalization fails.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// The path of `path` relative to `base` as a `/`-separated string.
pub fn relative_name(base: &Path, path: &Path) -> String {
    relative_path(base, path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// The final component of a path as a string, or an empty string.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_files() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("views");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("view.js"), "").unwrap();
        fs::write(tmp.path().join("core.js"), "").unwrap();
        fs::write(tmp.path().join("core.css"), "").unwrap();
        fs::write(tmp.path().join("LOGO.PNG"), "").unwrap();

        let files = find_files(tmp.path(), &["js"]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("core.js"));

        let images = find_files(tmp.path(), &["png", "gif"]).unwrap();
        assert_eq!(images.len(), 1);
    }

    #[test]
    fn test_find_files_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let files = find_files(&tmp.path().join("nope"), &["js"]).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_relative_name_uses_forward_slashes() {
        let base = Path::new("/pkg/frameworks/runtime");
        let path = base.join("views").join("view.js");
        assert_eq!(relative_name(base, &path), "views/view.js");
    }

    #[test]
    fn test_list_dirs() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("b")).unwrap();
        fs::create_dir_all(tmp.path().join("a")).unwrap();
        fs::write(tmp.path().join("file"), "").unwrap();

        let dirs = list_dirs(tmp.path()).unwrap();
        assert_eq!(dirs.len(), 2);
        assert!(dirs[0].ends_with("a"));
    }
}
