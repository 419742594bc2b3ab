//! Upgrades offered by the sync databases

use super::Found;
use crate::domain::{IgnoredUpgrade, InstalledPackage, Upgrade, UpgradeSource};
use crate::error::SourceError;
use crate::source::{LocalDb, SyncIndex};
use std::sync::Arc;
use tracing::debug;

/// Load the sync index on the blocking pool and compare every installed package
pub(crate) async fn fetch(
    local: Arc<dyn LocalDb>,
    installed: Arc<Vec<InstalledPackage>>,
) -> Result<Found, SourceError> {
    tokio::task::spawn_blocking(move || {
        let index = local.sync_index()?;
        Ok::<_, SourceError>(compare(&index, &installed))
    })
    .await
    .map_err(|e| SourceError::local_db(format!("sync database task failed: {}", e)))?
}

/// Collect upgrades for installed packages whose authoritative sync entry is newer
pub(crate) fn compare(index: &SyncIndex, installed: &[InstalledPackage]) -> Found {
    let mut found = Found::default();

    for package in installed {
        let Some(sync) = index.newer_version(package) else {
            continue;
        };

        if package.should_ignore() {
            found.ignored.push(IgnoredUpgrade::new(
                &package.name,
                &package.version,
                &sync.version,
            ));
            continue;
        }

        debug!(name = %package.name, db = %sync.db, version = %sync.version, "repo upgrade");
        found.upgrades.push_unique(Upgrade::new(
            &package.name,
            UpgradeSource::Repo(sync.db.clone()),
            &package.version,
            &sync.version,
        ));
    }

    found
}
