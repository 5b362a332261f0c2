//! Package file selection
//!
//! Patterns are expanded one at a time, in the order they are configured.
//! Each pattern's matches are sorted on their `/`-separated relative path so
//! the archive layout only depends on the files present, never on directory
//! iteration order. A file matched by two patterns is listed twice.

use crate::error::{PackError, Result};
use crate::models::FileEntry;
use crate::utils::archive_name;
use glob::{MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest entry whose bytes are always supplied by the transformer
pub const MANIFEST_ENTRY: &str = "manifest.json";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Expand `patterns` under `root` into root-relative file paths.
pub fn resolve_files(
    root: &Path,
    patterns: &[String],
    ignored: &BTreeSet<String>,
) -> Result<Vec<PathBuf>> {
    let escaped_root = PathBuf::from(Pattern::escape(&root.to_string_lossy()));
    let mut files = Vec::new();

    for pattern in patterns {
        let full_pattern = escaped_root.join(pattern);
        let matches = glob::glob_with(&full_pattern.to_string_lossy(), MATCH_OPTIONS).map_err(
            |source| PackError::Pattern {
                pattern: pattern.clone(),
                source,
            },
        )?;

        let mut found = Vec::new();
        for path in matches {
            let path = path.map_err(|e| {
                let path = e.path().to_path_buf();
                PackError::io(path, e.into())
            })?;

            if !path.is_file() || is_ignored(&path, ignored) {
                continue;
            }

            let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            found.push((archive_name(&relative), relative));
        }

        if found.is_empty() {
            log::debug!("pattern `{}` matched no files", pattern);
        }

        found.sort_by(|a, b| a.0.cmp(&b.0));
        files.extend(found.into_iter().map(|(_, relative)| relative));
    }

    Ok(files)
}

/// Read resolved files into memory, substituting the manifest bytes.
pub fn load_entries(root: &Path, paths: &[PathBuf], manifest: &[u8]) -> Result<Vec<FileEntry>> {
    paths
        .iter()
        .map(|relative| {
            if archive_name(relative) == MANIFEST_ENTRY {
                return Ok(FileEntry::new(relative.clone(), manifest.to_vec()));
            }

            let path = root.join(relative);
            let content = fs::read(&path).map_err(|e| PackError::io(&path, e))?;
            Ok(FileEntry::new(relative.clone(), content))
        })
        .collect()
}

fn is_ignored(path: &Path, ignored: &BTreeSet<String>) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| ignored.contains(name))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn touch(root: &Path, path: &str) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, path_bytes(&path)).unwrap();
    }

    fn path_bytes(path: &Path) -> Vec<u8> {
        path.to_string_lossy().as_bytes().to_vec()
    }

    fn patterns(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files.iter().map(|p| archive_name(p)).collect()
    }

    fn ignored(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_orders_by_pattern_then_path() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "manifest.json");
        touch(root, "bundles/manager.js");
        touch(root, "bundles/background.js");
        touch(root, "_locales/fr/messages.json");
        touch(root, "_locales/de/messages.json");

        let files = resolve_files(
            root,
            &patterns(&["manifest.json", "_locales/**/*", "bundles/*"]),
            &BTreeSet::new(),
        )
        .unwrap();

        assert_eq!(
            names(&files),
            vec![
                "manifest.json",
                "_locales/de/messages.json",
                "_locales/fr/messages.json",
                "bundles/background.js",
                "bundles/manager.js",
            ]
        );
    }

    #[test]
    fn test_resolve_filters_directories_and_ignored_names() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "style/common.css");
        touch(root, "style/.DS_Store");
        touch(root, "style/Thumbs.db");
        touch(root, "style/sub/nested.css");
        touch(root, "style/done.opus");

        let files = resolve_files(
            root,
            &patterns(&["style/*"]),
            &ignored(&[".DS_Store", "Thumbs.db", "done.opus"]),
        )
        .unwrap();

        assert_eq!(names(&files), vec!["style/common.css"]);
    }

    #[test]
    fn test_resolve_keeps_cross_pattern_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "Readme.md");

        let files = resolve_files(
            root,
            &patterns(&["Readme.*", "*.md"]),
            &BTreeSet::new(),
        )
        .unwrap();

        assert_eq!(names(&files), vec!["Readme.md", "Readme.md"]);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for name in ["b.html", "a.html", "Z.html"] {
            touch(root, &format!("windows/{name}"));
        }
        let pats = patterns(&["windows/*.html"]);

        let first = resolve_files(root, &pats, &BTreeSet::new()).unwrap();
        let second = resolve_files(root, &pats, &BTreeSet::new()).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            names(&first),
            vec!["windows/Z.html", "windows/a.html", "windows/b.html"]
        );
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let err = resolve_files(temp_dir.path(), &patterns(&["bundles/[*"]), &BTreeSet::new())
            .unwrap_err();
        assert!(matches!(err, PackError::Pattern { .. }));
    }

    #[test]
    fn test_load_entries_substitutes_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "manifest.json");
        touch(root, "bundles/main.js");

        let paths = vec![PathBuf::from("manifest.json"), PathBuf::from("bundles/main.js")];
        let entries = load_entries(root, &paths, b"{\"name\":\"x\"}").unwrap();

        assert_eq!(entries[0].content, b"{\"name\":\"x\"}".to_vec());
        assert_eq!(entries[1].content, path_bytes(&root.join("bundles/main.js")));
    }
}
