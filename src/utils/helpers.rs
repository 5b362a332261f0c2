//! Helper utility functions

use chrono::NaiveDateTime;
use std::path::{Component, Path};

/// Archive entry name for a root-relative path: `/`-separated on every OS
pub fn archive_name(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Check a path's extension (without the dot) against a set of names
pub fn has_extension<'a, I>(path: &Path, extensions: I) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => extensions.into_iter().any(|e| e == ext),
        None => false,
    }
}

/// `YYYYMMDDHHMMSS` stamp appended to nightly versions
pub fn nightly_stamp(now: &NaiveDateTime) -> String {
    now.format("%Y%m%d%H%M%S").to_string()
}
