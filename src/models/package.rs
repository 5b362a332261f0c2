//! Package contents and build outputs

use super::manifest::ManifestDescriptor;
use super::target::BuildTarget;
use std::path::PathBuf;

/// A file selected for packaging, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub content: Vec<u8>,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>, content: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            content,
        }
    }

    /// Name of the entry inside the archive, always `/`-separated
    pub fn archive_name(&self) -> String {
        crate::utils::archive_name(&self.path)
    }
}

/// Manifest derived for a single target, plus where its archive goes
#[derive(Debug, Clone, PartialEq)]
pub struct TargetManifest {
    pub manifest: ManifestDescriptor,
    pub version: String,
    pub output_path: PathBuf,
}

/// One archive written by a build
#[derive(Debug, Clone)]
pub struct PackageOutput {
    pub target: BuildTarget,
    pub version: String,
    pub path: PathBuf,
    pub entries: usize,
}

#[derive(Debug, Clone, Default)]
pub struct BuildSummary {
    pub outputs: Vec<PackageOutput>,
    pub audited_files: usize,
}
