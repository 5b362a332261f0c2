//! Manifest transformation for each packaging target

use crate::config::{BuildConfig, GeckoIdentity};
use crate::error::Result;
use crate::models::{BuildTarget, ManifestDescriptor, Mode, Platform, TargetManifest};
use crate::utils::nightly_stamp;
use chrono::NaiveDateTime;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub struct ManifestTransformer {
    product: String,
    artifacts_dir: PathBuf,
    identity: GeckoIdentity,
}

impl ManifestTransformer {
    pub fn new(product: impl Into<String>, artifacts_dir: impl Into<PathBuf>, identity: GeckoIdentity) -> Self {
        Self {
            product: product.into(),
            artifacts_dir: artifacts_dir.into(),
            identity,
        }
    }

    /// Transformer writing into the configured artifacts directory under `root`
    pub fn from_config(root: &Path, config: &BuildConfig) -> Self {
        Self::new(
            config.product.clone(),
            root.join(&config.artifacts_dir),
            config.identity.clone(),
        )
    }

    /// Derive the manifest for `target`. `base` is left untouched.
    pub fn transform(
        &self,
        base: &ManifestDescriptor,
        target: &BuildTarget,
        now: &NaiveDateTime,
    ) -> Result<TargetManifest> {
        let mut manifest = base.clone();

        // 1. Version, stamped for nightlies
        let version = self.transform_version(&mut manifest, target.mode, now)?;

        // 2. Channel naming for everything but release
        self.transform_naming(&mut manifest, target.mode, &version)?;

        // 3. Platform identity
        match target.platform() {
            Platform::Gecko => self.set_gecko_id(&mut manifest, target.mode)?,
            Platform::Chromium => {
                manifest.remove("browser_specific_settings");
            }
        }

        // 4. Permissions the platform does not know
        prune_permissions(&mut manifest, &target.spec.excluded_permissions)?;

        let output_path = self.output_path(&version, target);

        Ok(TargetManifest {
            manifest,
            version,
            output_path,
        })
    }

    fn transform_version(
        &self,
        manifest: &mut ManifestDescriptor,
        mode: Mode,
        now: &NaiveDateTime,
    ) -> Result<String> {
        let version = manifest.version()?.to_string();
        if mode != Mode::Nightly {
            return Ok(version);
        }

        let stamped = format!("{}.{}", version, nightly_stamp(now));
        manifest.insert("version", stamped.clone());
        Ok(stamped)
    }

    fn transform_naming(&self, manifest: &mut ManifestDescriptor, mode: Mode, version: &str) -> Result<()> {
        if mode.is_release() {
            return Ok(());
        }

        let name = manifest.name()?.to_string();
        manifest.insert("version_name", format!("{}-{}", version, mode));
        manifest.insert("short_name", name.clone());
        manifest.insert("name", format!("{} {}", name, mode));
        Ok(())
    }

    fn set_gecko_id(&self, manifest: &mut ManifestDescriptor, mode: Mode) -> Result<()> {
        let id = self.gecko_id(mode);
        manifest
            .gecko_settings_mut()?
            .insert("id".to_string(), Value::String(id));
        Ok(())
    }

    pub fn gecko_id(&self, mode: Mode) -> String {
        if mode.is_release() {
            self.identity.release_id.clone()
        } else {
            format!("{}@{}", mode, self.identity.id_domain)
        }
    }

    pub fn output_path(&self, version: &str, target: &BuildTarget) -> PathBuf {
        self.artifacts_dir.join(format!(
            "{}-{}-{}-{}.zip",
            self.product,
            version,
            target.mode,
            target.tag()
        ))
    }
}

/// Drop excluded permissions, keeping the order of the rest
fn prune_permissions(manifest: &mut ManifestDescriptor, excluded: &BTreeSet<String>) -> Result<()> {
    let permissions = manifest
        .permissions()?
        .into_iter()
        .filter(|p| !excluded.contains(p))
        .collect();
    manifest.set_permissions(permissions);
    Ok(())
}
