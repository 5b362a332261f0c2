//! Error types for the packaging pipeline

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

pub type Result<T> = std::result::Result<T, PackError>;

#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("no license marker in {}", format_paths(.files))]
    LicenseViolation { files: Vec<PathBuf> },

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write archive {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("invalid file pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("invalid build configuration {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("asset build command `{command}` failed ({status})")]
    UpstreamBuildFailure { command: String, status: ExitStatus },
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest {} is not valid JSON: {message}", .path.display())]
    Malformed { path: PathBuf, message: String },

    #[error("manifest {} must contain a JSON object", .path.display())]
    NotAnObject { path: PathBuf },

    #[error("manifest is missing required key `{0}`")]
    MissingKey(String),

    #[error("manifest key `{key}` must be {expected}")]
    WrongType { key: String, expected: &'static str },

    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PackError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        PackError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn archive(path: impl AsRef<Path>, source: zip::result::ZipError) -> Self {
        PackError::Archive {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
