//! Parsed `[epoch:]version[-release]` strings

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static COMPLETE_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+):)?([A-Za-z0-9._+~]+)(?:-([A-Za-z0-9.]+))?$").unwrap()
});

/// A package version split into its three components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteVersion {
    /// Epoch, 0 when absent
    pub epoch: u64,
    /// Upstream version
    pub version: String,
    /// Package release, empty when absent
    pub release: String,
}

impl CompleteVersion {
    /// Parse a version string, returning None when it does not fit the grammar
    pub fn parse(s: &str) -> Option<Self> {
        let caps = COMPLETE_VERSION_RE.captures(s)?;
        let epoch = match caps.get(1) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };

        Some(Self {
            epoch,
            version: caps[2].to_string(),
            release: caps
                .get(3)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
    }

    /// Version text including a non-zero epoch prefix
    pub fn epoch_version(&self) -> String {
        if self.epoch > 0 {
            format!("{}:{}", self.epoch, self.version)
        } else {
            self.version.clone()
        }
    }

    /// Whether epoch and version match, ignoring the release
    pub fn same_upstream(&self, other: &Self) -> bool {
        self.epoch == other.epoch && self.version == other.version
    }
}

impl fmt::Display for CompleteVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.epoch_version())?;
        if !self.release.is_empty() {
            write!(f, "-{}", self.release)?;
        }
        Ok(())
    }
}
