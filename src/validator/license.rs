//! License header audit
//!
//! Every source file with a license-bearing extension has to carry the
//! license marker. The audit walks the whole project tree, collects every
//! offender and fails once at the end so a single run reports all of them.

use crate::config::LicensePolicy;
use crate::error::{PackError, Result};
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Audit all files under `root`. Returns the number of files checked.
pub fn audit_licenses(root: &Path, policy: &LicensePolicy) -> Result<usize> {
    let mut checked = 0;
    let mut violations = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry, policy));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            PackError::io(path, e.into())
        })?;

        if !entry.file_type().is_file() || !policy.applies_to(entry.path()) {
            continue;
        }

        let content = fs::read(entry.path()).map_err(|e| PackError::io(entry.path(), e))?;
        checked += 1;

        if !policy.is_satisfied_by(&content) {
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            log::debug!("missing license marker: {}", relative.display());
            violations.push(relative.to_path_buf());
        }
    }

    if !violations.is_empty() {
        return Err(PackError::LicenseViolation { files: violations });
    }

    log::info!("license audit passed ({} files)", checked);
    Ok(checked)
}

/// Check a single file's content, as done again right before archiving
pub fn check_license(path: &Path, content: &[u8], policy: &LicensePolicy) -> Result<()> {
    if policy.applies_to(path) && !policy.is_satisfied_by(content) {
        return Err(PackError::LicenseViolation {
            files: vec![path.to_path_buf()],
        });
    }
    Ok(())
}

fn is_skipped_dir(entry: &DirEntry, policy: &LicensePolicy) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| policy.skip_dirs.contains(name))
            .unwrap_or(false)
}
