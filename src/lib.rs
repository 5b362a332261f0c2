//! DownThemAll! extension packager
//!
//! Builds one reproducible zip package per browser target from the extension
//! source tree: license audit, asset build, file selection, per-target
//! manifest rewriting and archive writing.

pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod transformer;
pub mod packager;
pub mod validator;
pub mod utils;

pub use config::{load_config, BuildConfig};
pub use error::{ManifestError, PackError};
pub use models::{BuildSummary, BuildTarget, ManifestDescriptor, Mode, PackageOutput, Platform, TargetSpec};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use packager::{ArchiveWriter, MANIFEST_ENTRY};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use transformer::ManifestTransformer;

/// Main entry point: package every configured target of the project at `root`
pub fn build_package(root: &Path, config: &BuildConfig, options: &BuildOptions) -> Result<BuildSummary> {
    // 1. Refuse to package unlicensed sources
    let audited_files = validator::audit_licenses(root, &config.license)
        .context("license audit failed")?;

    // 2. Generate bundles and styles
    if options.run_scripts {
        packager::run_scripts(root, &config.scripts).context("asset build failed")?;
    } else {
        log::warn!("skipping asset build commands");
    }

    // 3. Base manifest, shared read-only by every target
    let manifest_path = root.join(MANIFEST_ENTRY);
    let base = parser::parse_manifest_from_file(&manifest_path)
        .with_context(|| format!("failed to load {}", manifest_path.display()))?;

    // 4. One archive per target, stopping at the first failure
    let packager = Packager::new(root, config, Local::now().naive_local());
    let mut summary = BuildSummary {
        outputs: Vec::with_capacity(config.targets.len()),
        audited_files,
    };

    for spec in &config.targets {
        let target = BuildTarget::new(options.mode, spec.clone());
        let output = packager
            .package(&base, &target)
            .with_context(|| format!("failed to package target {}", target))?;
        summary.outputs.push(output);
    }

    Ok(summary)
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub mode: Mode,
    /// Run the configured asset build commands before packaging
    pub run_scripts: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Development,
            run_scripts: true,
        }
    }
}

/// Packages single targets of one project
pub struct Packager<'a> {
    root: PathBuf,
    config: &'a BuildConfig,
    transformer: ManifestTransformer,
    now: NaiveDateTime,
}

impl<'a> Packager<'a> {
    /// `now` is the build time stamped into nightly versions.
    pub fn new(root: &Path, config: &'a BuildConfig, now: NaiveDateTime) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
            transformer: ManifestTransformer::from_config(root, config),
            now,
        }
    }

    pub fn package(&self, base: &ManifestDescriptor, target: &BuildTarget) -> error::Result<PackageOutput> {
        let ignored: BTreeSet<String> = self
            .config
            .ignored_files
            .union(&target.spec.ignored_files)
            .cloned()
            .collect();
        let paths = packager::resolve_files(&self.root, &self.config.files, &ignored)?;

        let target_manifest = self.transformer.transform(base, target, &self.now)?;
        log::info!("Output {}", target_manifest.output_path.display());

        let entries = packager::load_entries(&self.root, &paths, &target_manifest.manifest.to_bytes()?)?;
        let writer = ArchiveWriter::new(&self.config.archive, &self.config.license);
        let written = writer.write(&entries, &target_manifest.output_path)?;

        Ok(PackageOutput {
            target: target.clone(),
            version: target_manifest.version,
            path: target_manifest.output_path,
            entries: written,
        })
    }
}
