//! Upgrade records and the per-source lists holding them

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Candidate version used for development packages
pub const LATEST_COMMIT: &str = "latest-commit";

/// Where an upgrade comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum UpgradeSource {
    /// A configured sync database, by name
    Repo(String),
    /// The AUR
    Aur,
    /// A VCS package whose upstream moved
    Devel,
}

impl UpgradeSource {
    /// Label printed in front of the package name
    pub fn label(&self) -> &str {
        match self {
            UpgradeSource::Repo(db) => db,
            UpgradeSource::Aur => "aur",
            UpgradeSource::Devel => "devel",
        }
    }
}

impl fmt::Display for UpgradeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single candidate upgrade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrade {
    /// Package name
    pub name: String,
    /// Source offering the new version
    pub source: UpgradeSource,
    /// Installed version
    pub local_version: String,
    /// Version that would be installed
    pub remote_version: String,
}

impl Upgrade {
    /// Create a new upgrade record
    pub fn new(
        name: impl Into<String>,
        source: UpgradeSource,
        local_version: impl Into<String>,
        remote_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            local_version: local_version.into(),
            remote_version: remote_version.into(),
        }
    }

    /// Create a development package upgrade
    pub fn devel(name: impl Into<String>, local_version: impl Into<String>) -> Self {
        Self::new(name, UpgradeSource::Devel, local_version, LATEST_COMMIT)
    }
}

impl fmt::Display for Upgrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}: {} → {}",
            self.source, self.name, self.local_version, self.remote_version
        )
    }
}

/// An upgrade that exists but was withheld because the package is ignored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoredUpgrade {
    pub name: String,
    pub local_version: String,
    pub remote_version: String,
}

impl IgnoredUpgrade {
    pub fn new(
        name: impl Into<String>,
        local_version: impl Into<String>,
        remote_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            local_version: local_version.into(),
            remote_version: remote_version.into(),
        }
    }
}

/// Ordered upgrades from one source category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpgradeList(Vec<Upgrade>);

impl UpgradeList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an upgrade unconditionally
    pub fn push(&mut self, upgrade: Upgrade) {
        self.0.push(upgrade);
    }

    /// Append an upgrade unless one with the same name is already present
    ///
    /// Returns false when the upgrade was dropped as a duplicate.
    pub fn push_unique(&mut self, upgrade: Upgrade) -> bool {
        if self.contains(&upgrade.name) {
            return false;
        }
        self.0.push(upgrade);
        true
    }

    /// Whether an upgrade for `name` is present
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|u| u.name == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Upgrade> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Upgrade> {
        self.0.iter()
    }

    /// Package names in list order
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|u| u.name.as_str()).collect()
    }

    /// Sort for display: repository names descending, case-insensitive first
    pub fn sort_by_repository(&mut self) {
        self.0
            .sort_by(|a, b| repository_order(b.source.label(), a.source.label()));
    }
}

/// Character-wise comparison, lowercase forms first, original chars as a tiebreak
fn repository_order(a: &str, b: &str) -> Ordering {
    for (ca, cb) in a.chars().zip(b.chars()) {
        let la = ca.to_lowercase().next().unwrap_or(ca);
        let lb = cb.to_lowercase().next().unwrap_or(cb);
        if la != lb {
            return la.cmp(&lb);
        }
        if ca != cb {
            return ca.cmp(&cb);
        }
    }
    Ordering::Equal
}

impl From<Vec<Upgrade>> for UpgradeList {
    fn from(upgrades: Vec<Upgrade>) -> Self {
        Self(upgrades)
    }
}

impl FromIterator<Upgrade> for UpgradeList {
    fn from_iter<I: IntoIterator<Item = Upgrade>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a UpgradeList {
    type Item = &'a Upgrade;
    type IntoIter = std::slice::Iter<'a, Upgrade>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
