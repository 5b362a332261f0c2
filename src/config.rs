//! Build configuration
//!
//! Defaults reproduce the DownThemAll! release setup. A project can override
//! any subset of fields with a JSON5 file passed on the command line.

use crate::error::{PackError, Result};
use crate::models::{Platform, TargetSpec};
use crate::utils::has_extension;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Add-on ID the release channel is signed under on addons.mozilla.org
pub const RELEASE_ID: &str = "{DDC359D1-844A-42a7-9AA1-88A850A938A8}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Product prefix of every archive name
    pub product: String,
    /// Output directory, relative to the project root
    pub artifacts_dir: PathBuf,
    /// Glob patterns selecting package contents, in archive order
    pub files: Vec<String>,
    /// File names never packaged, for every target
    pub ignored_files: BTreeSet<String>,
    /// Shell commands producing generated assets, run before packaging
    pub scripts: Vec<String>,
    pub license: LicensePolicy,
    pub archive: ArchiveSettings,
    pub identity: GeckoIdentity,
    pub targets: Vec<TargetSpec>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            product: "dta".to_string(),
            artifacts_dir: PathBuf::from("web-ext-artifacts"),
            files: strings([
                "manifest.json",
                "_locales/**/*",
                "bundles/*",
                "style/*",
                "uikit/css/*",
                "windows/*.html",
                "Readme.*",
                "LICENSE.*",
            ]),
            ignored_files: string_set([".DS_Store", "Thumbs.db"]),
            scripts: strings(["yarn build:regexps", "yarn build:bundles"]),
            license: LicensePolicy::default(),
            archive: ArchiveSettings::default(),
            identity: GeckoIdentity::default(),
            targets: default_targets(),
        }
    }
}

/// Which files must carry a license header and how it is recognized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LicensePolicy {
    pub marker: String,
    /// Extensions (without the dot) of files that must contain the marker
    pub extensions: BTreeSet<String>,
    /// Directory names the audit never descends into
    pub skip_dirs: BTreeSet<String>,
}

impl Default for LicensePolicy {
    fn default() -> Self {
        Self {
            marker: "License:".to_string(),
            extensions: string_set(["css", "html", "js"]),
            skip_dirs: string_set(["node_modules"]),
        }
    }
}

impl LicensePolicy {
    pub fn applies_to(&self, path: &Path) -> bool {
        has_extension(path, &self.extensions)
    }

    pub fn is_satisfied_by(&self, content: &[u8]) -> bool {
        let marker = self.marker.as_bytes();
        marker.is_empty() || content.windows(marker.len()).any(|w| w == marker)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveSettings {
    /// Extensions of already-compressed formats, stored as-is
    pub uncompressible_extensions: BTreeSet<String>,
    /// Deflate level for every other entry
    pub compression_level: i32,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            uncompressible_extensions: string_set(["png", "jpg", "zip", "woff2"]),
            compression_level: 2,
        }
    }
}

impl ArchiveSettings {
    pub fn is_uncompressible(&self, path: &Path) -> bool {
        has_extension(path, &self.uncompressible_extensions)
    }
}

/// Add-on identity written into Gecko manifests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeckoIdentity {
    pub release_id: String,
    /// Domain of the per-mode IDs (`beta@<domain>`, ...)
    pub id_domain: String,
}

impl Default for GeckoIdentity {
    fn default() -> Self {
        Self {
            release_id: RELEASE_ID.to_string(),
            id_domain: "downthemall.org".to_string(),
        }
    }
}

pub fn default_targets() -> Vec<TargetSpec> {
    let chromium_excluded = ["menus", "sessions", "theme"];

    vec![
        TargetSpec::new("fx", Platform::Gecko).excluding_permissions([
            "downloads.shelf",
            "webRequest",
            "webRequestBlocking",
        ]),
        TargetSpec::new("crx", Platform::Chromium).excluding_permissions(chromium_excluded),
        TargetSpec::new("opr", Platform::Chromium)
            .excluding_permissions(chromium_excluded)
            .ignoring_files(["done.opus", "error.opus"]),
    ]
}

/// Load a configuration file; fields it leaves out keep their defaults.
pub fn load_config(path: &Path) -> Result<BuildConfig> {
    let text = fs::read_to_string(path).map_err(|e| PackError::io(path, e))?;
    parse_config(&text).map_err(|message| PackError::Config {
        path: path.to_path_buf(),
        message,
    })
}

fn parse_config(text: &str) -> std::result::Result<BuildConfig, String> {
    let config: BuildConfig = json5::from_str(text).map_err(|e| e.to_string())?;

    if config.targets.is_empty() {
        return Err("at least one target is required".to_string());
    }
    if !(0..=9).contains(&config.archive.compression_level) {
        return Err(format!(
            "compression level {} is outside 0..=9",
            config.archive.compression_level
        ));
    }

    Ok(config)
}

fn strings<const N: usize>(items: [&str; N]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn string_set<const N: usize>(items: [&str; N]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}
