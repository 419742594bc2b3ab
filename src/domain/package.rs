//! Package records read from the local database and remote indexes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A package installed on the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPackage {
    /// Package name
    pub name: String,
    /// Installed version
    pub version: String,
    /// When the installed package was built
    pub build_date: Option<DateTime<Utc>>,
    /// Whether the package is absent from every sync database
    pub foreign: bool,
    /// Whether upgrades for this package are ignored
    pub ignored: bool,
}

impl InstalledPackage {
    /// Create an installed package from a sync database
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            build_date: None,
            foreign: false,
            ignored: false,
        }
    }

    /// Mark this package as foreign (installed from outside the sync databases)
    pub fn foreign(mut self) -> Self {
        self.foreign = true;
        self
    }

    /// Mark this package as ignored
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Set the build date
    pub fn with_build_date(mut self, build_date: DateTime<Utc>) -> Self {
        self.build_date = Some(build_date);
        self
    }

    /// Whether upgrades for this package must be withheld
    pub fn should_ignore(&self) -> bool {
        self.ignored
    }
}

/// A package available in a sync database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPackage {
    pub name: String,
    pub version: String,
    /// Name of the sync database carrying the package
    pub db: String,
}

impl SyncPackage {
    pub fn new(db: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            db: db.into(),
        }
    }
}

/// A package as reported by the foreign index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignPackage {
    pub name: String,
    pub version: String,
    /// When the package metadata was last modified
    pub last_modified: DateTime<Utc>,
}

impl ForeignPackage {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        last_modified: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            last_modified,
        }
    }
}
