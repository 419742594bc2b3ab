//! Collaborators that supply upgrade candidates
//!
//! This module provides:
//! - [`LocalDb`]: installed packages and the sync database index
//! - [`ForeignIndex`]: metadata for packages outside the sync databases
//! - [`VcsStore`]: last seen commits of development packages
//!
//! along with one concrete implementation of each (pacman, AUR RPC, JSON file).

mod aur;
mod client;
mod ignore;
mod pacman;
mod sync;
mod vcs;

pub use aur::{AurClient, AUR_URL};
pub use client::{HttpClient, DEFAULT_TIMEOUT};
pub use ignore::IgnoreRules;
pub use pacman::{PacmanDb, DEFAULT_DB_PATH};
pub use sync::SyncIndex;
pub use vcs::{VcsFile, VcsInfo};

use crate::domain::{ForeignPackage, InstalledPackage};
use crate::error::SourceError;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};

/// Read-only view of the local package database
///
/// Calls block; async callers run them on the blocking pool.
pub trait LocalDb: Send + Sync {
    /// Every installed package
    fn installed(&self) -> Result<Vec<InstalledPackage>, SourceError>;

    /// Packages available from the sync databases
    fn sync_index(&self) -> Result<SyncIndex, SourceError>;
}

/// Remote index of foreign packages
#[async_trait]
pub trait ForeignIndex: Send + Sync {
    /// Name used in errors and logs
    fn source_name(&self) -> &'static str;

    /// Look up `names`; names unknown to the index are absent from the result
    async fn info(&self, names: &[String]) -> Result<HashMap<String, ForeignPackage>, SourceError>;
}

/// Store of VCS metadata for development packages
#[async_trait]
pub trait VcsStore: Send + Sync {
    /// All tracked packages
    async fn entries(&self) -> Result<BTreeMap<String, VcsInfo>, SourceError>;

    /// Whether upstream moved past the recorded commit; failures read as false
    async fn needs_update(&self, info: &VcsInfo) -> bool;

    /// Forget the given packages
    async fn remove(&self, names: &[String]) -> Result<(), SourceError>;
}
