//! Build modes and packaging targets

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Development,
    Beta,
    Release,
    Nightly,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Development, Mode::Beta, Mode::Release, Mode::Nightly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Beta => "beta",
            Mode::Release => "release",
            Mode::Nightly => "nightly",
        }
    }

    pub fn is_release(&self) -> bool {
        matches!(self, Mode::Release)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Mode::Development),
            _ => Mode::ALL
                .into_iter()
                .find(|mode| mode.as_str() == s)
                .ok_or_else(|| format!("unknown build mode `{s}`")),
        }
    }
}

/// Browser engine family a package is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Gecko,
    Chromium,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Gecko => write!(f, "gecko"),
            Platform::Chromium => write!(f, "chromium"),
        }
    }
}

/// Static description of one package variant, independent of the build mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Short tag used in the archive name (`fx`, `crx`, `opr`)
    pub tag: String,
    pub platform: Platform,
    /// Permissions dropped from the manifest for this target
    #[serde(default)]
    pub excluded_permissions: BTreeSet<String>,
    /// File names left out of this target's archive on top of the global ignores
    #[serde(default)]
    pub ignored_files: BTreeSet<String>,
}

impl TargetSpec {
    pub fn new(tag: impl Into<String>, platform: Platform) -> Self {
        Self {
            tag: tag.into(),
            platform,
            excluded_permissions: BTreeSet::new(),
            ignored_files: BTreeSet::new(),
        }
    }

    pub fn excluding_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_permissions
            .extend(permissions.into_iter().map(Into::into));
        self
    }

    pub fn ignoring_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_files.extend(files.into_iter().map(Into::into));
        self
    }
}

/// A target spec paired with the mode of the current invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub mode: Mode,
    pub spec: TargetSpec,
}

impl BuildTarget {
    pub fn new(mode: Mode, spec: TargetSpec) -> Self {
        Self { mode, spec }
    }

    pub fn platform(&self) -> Platform {
        self.spec.platform
    }

    pub fn tag(&self) -> &str {
        &self.spec.tag
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.spec.tag, self.spec.platform, self.mode)
    }
}
