//! Manifest parsing functionality

use crate::error::{ManifestError, PackError, Result};
use crate::models::ManifestDescriptor;
use serde_json::Value;
use std::path::Path;

/// Parse manifest.json from bytes. `origin` is only used in error messages.
pub fn parse_manifest(content: &[u8], origin: &Path) -> Result<ManifestDescriptor> {
    let malformed = |message: String| ManifestError::Malformed {
        path: origin.to_path_buf(),
        message,
    };

    let content_str = std::str::from_utf8(content)
        .map_err(|e| malformed(format!("invalid UTF-8: {e}")))?;

    // Plain JSON first; json5 only for manifests carrying comments
    let value: Value = match serde_json::from_str(content_str) {
        Ok(value) => value,
        Err(_) => json5::from_str(content_str).map_err(|e| malformed(e.to_string()))?,
    };

    match value {
        Value::Object(entries) => Ok(ManifestDescriptor::new(entries)),
        _ => Err(ManifestError::NotAnObject {
            path: origin.to_path_buf(),
        }
        .into()),
    }
}

/// Parse manifest.json from file path
pub fn parse_manifest_from_file(path: impl AsRef<Path>) -> Result<ManifestDescriptor> {
    let path = path.as_ref();
    let content = std::fs::read(path).map_err(|e| PackError::io(path, e))?;
    parse_manifest(&content, path)
}
