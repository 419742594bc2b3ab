//! Upgrade discovery across all sources
//!
//! This module provides:
//! - [`list_upgrades`]: reads the installed packages, then queries the sync
//!   databases and the foreign index concurrently
//! - Partial failure handling: a failing source is logged, recorded in the
//!   report and contributes an empty list
//! - Development package checks fanned out from the foreign fetch

mod devel;
mod foreign;
mod repo;

use crate::domain::{IgnoredUpgrade, Upgrade, UpgradeList};
use crate::error::SourceError;
use crate::selection::ListTotals;
use crate::source::{ForeignIndex, LocalDb, VcsStore};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

/// Switches controlling what counts as an upgrade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpgradeOptions {
    /// Check development packages against their upstream
    pub devel: bool,
    /// Treat a newer foreign index modification time as an upgrade
    pub time_update: bool,
}

impl UpgradeOptions {
    pub fn with_devel(mut self, devel: bool) -> Self {
        self.devel = devel;
        self
    }

    pub fn with_time_update(mut self, time_update: bool) -> Self {
        self.time_update = time_update;
        self
    }
}

/// Collaborators queried for upgrades
#[derive(Clone)]
pub struct Sources {
    pub local: Arc<dyn LocalDb>,
    pub foreign: Arc<dyn ForeignIndex>,
    pub vcs: Arc<dyn VcsStore>,
}

impl Sources {
    pub fn new(
        local: Arc<dyn LocalDb>,
        foreign: Arc<dyn ForeignIndex>,
        vcs: Arc<dyn VcsStore>,
    ) -> Self {
        Self {
            local,
            foreign,
            vcs,
        }
    }
}

/// Everything discovered in one run
#[derive(Debug, Clone, Default)]
pub struct UpgradeReport {
    /// AUR and devel upgrades, in discovery order
    pub foreign: UpgradeList,
    /// Sync database upgrades, sorted for display
    pub repo: UpgradeList,
    /// Upgrades withheld by ignore rules
    pub ignored: Vec<IgnoredUpgrade>,
    /// Sources that failed
    pub errors: Vec<SourceError>,
}

impl UpgradeReport {
    pub fn totals(&self) -> ListTotals {
        ListTotals::new(self.foreign.len(), self.repo.len())
    }

    /// Whether there is nothing to upgrade
    pub fn is_empty(&self) -> bool {
        self.foreign.is_empty() && self.repo.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// What one source produced
#[derive(Debug, Default)]
pub(crate) struct Found {
    pub upgrades: UpgradeList,
    pub ignored: Vec<IgnoredUpgrade>,
}

/// An item travelling through the foreign result channel
#[derive(Debug)]
pub(crate) enum Candidate {
    Upgrade(Upgrade),
    Ignored(IgnoredUpgrade),
}

/// Collect upgrades from every source
///
/// Only a failure to read the installed packages is returned as an error.
/// Failures of the sync or foreign fetch end up in [`UpgradeReport::errors`].
pub async fn list_upgrades(
    sources: &Sources,
    options: UpgradeOptions,
) -> Result<UpgradeReport, SourceError> {
    let local = Arc::clone(&sources.local);
    let installed = tokio::task::spawn_blocking(move || local.installed())
        .await
        .map_err(|e| SourceError::local_db(format!("local database task failed: {}", e)))??;
    debug!(count = installed.len(), "installed packages");
    let installed = Arc::new(installed);

    let (err_tx, mut err_rx) = mpsc::unbounded_channel::<SourceError>();
    let (repo_tx, mut repo_rx) = oneshot::channel::<Found>();
    let (foreign_tx, mut foreign_rx) = oneshot::channel::<Found>();

    {
        let local = Arc::clone(&sources.local);
        let installed = Arc::clone(&installed);
        let err_tx = err_tx.clone();
        tokio::spawn(async move {
            let found = repo::fetch(local, installed).await.unwrap_or_else(|e| {
                let _ = err_tx.send(e);
                Found::default()
            });
            let _ = repo_tx.send(found);
        });
    }

    {
        let index = Arc::clone(&sources.foreign);
        let vcs = Arc::clone(&sources.vcs);
        let installed = Arc::clone(&installed);
        let err_tx = err_tx.clone();
        tokio::spawn(async move {
            let found = foreign::fetch(index, vcs, installed, options, err_tx).await;
            let _ = foreign_tx.send(found);
        });
    }
    drop(err_tx);

    let mut repo_found: Option<Found> = None;
    let mut foreign_found: Option<Found> = None;
    let mut errors = Vec::new();

    while repo_found.is_none() || foreign_found.is_none() {
        tokio::select! {
            result = &mut repo_rx, if repo_found.is_none() => {
                let found = result.unwrap_or_default();
                info!(upgrades = found.upgrades.len(), "sync databases checked");
                repo_found = Some(found);
            }
            result = &mut foreign_rx, if foreign_found.is_none() => {
                let found = result.unwrap_or_default();
                info!(upgrades = found.upgrades.len(), "foreign packages checked");
                foreign_found = Some(found);
            }
            Some(err) = err_rx.recv() => {
                error!(error = %err, "upgrade source failed");
                errors.push(err);
            }
        }
    }

    // Errors sent right before a result may still be queued.
    while let Ok(err) = err_rx.try_recv() {
        error!(error = %err, "upgrade source failed");
        errors.push(err);
    }

    let repo_found = repo_found.unwrap_or_default();
    let foreign_found = foreign_found.unwrap_or_default();

    let mut repo = repo_found.upgrades;
    repo.sort_by_repository();

    let mut ignored = repo_found.ignored;
    ignored.extend(foreign_found.ignored);

    Ok(UpgradeReport {
        foreign: foreign_found.upgrades,
        repo,
        ignored,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ForeignPackage, InstalledPackage, SyncPackage, UpgradeSource, LATEST_COMMIT};
    use crate::source::{SyncIndex, VcsInfo};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;

    struct FakeDb {
        installed: Result<Vec<InstalledPackage>, SourceError>,
        sync: Result<Vec<SyncPackage>, SourceError>,
    }

    impl LocalDb for FakeDb {
        fn installed(&self) -> Result<Vec<InstalledPackage>, SourceError> {
            self.installed.clone()
        }

        fn sync_index(&self) -> Result<SyncIndex, SourceError> {
            self.sync.clone().map(SyncIndex::new)
        }
    }

    struct FakeIndex(Result<Vec<ForeignPackage>, SourceError>);

    #[async_trait]
    impl ForeignIndex for FakeIndex {
        fn source_name(&self) -> &'static str {
            "fake"
        }

        async fn info(
            &self,
            names: &[String],
        ) -> Result<HashMap<String, ForeignPackage>, SourceError> {
            let packages = self.0.clone()?;
            Ok(packages
                .into_iter()
                .filter(|p| names.contains(&p.name))
                .map(|p| (p.name.clone(), p))
                .collect())
        }
    }

    #[derive(Default)]
    struct FakeVcs {
        entries: BTreeMap<String, VcsInfo>,
        removed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl VcsStore for FakeVcs {
        async fn entries(&self) -> Result<BTreeMap<String, VcsInfo>, SourceError> {
            Ok(self.entries.clone())
        }

        async fn needs_update(&self, info: &VcsInfo) -> bool {
            info.sha == "old"
        }

        async fn remove(&self, names: &[String]) -> Result<(), SourceError> {
            self.removed.lock().unwrap().extend(names.iter().cloned());
            Ok(())
        }
    }

    fn when(day: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn sources(db: FakeDb, index: FakeIndex, vcs: Arc<FakeVcs>) -> Sources {
        Sources::new(Arc::new(db), Arc::new(index), vcs)
    }

    fn basic_db() -> FakeDb {
        FakeDb {
            installed: Ok(vec![
                InstalledPackage::new("a", "1.0-1"),
                InstalledPackage::new("b", "2.0-1").foreign(),
            ]),
            sync: Ok(vec![SyncPackage::new("core", "a", "1.0-2")]),
        }
    }

    fn basic_index() -> FakeIndex {
        FakeIndex(Ok(vec![ForeignPackage::new("b", "2.1-1", when(1))]))
    }

    #[tokio::test]
    async fn test_both_sources() {
        let sources = sources(basic_db(), basic_index(), Arc::default());
        let report = list_upgrades(&sources, UpgradeOptions::default())
            .await
            .unwrap();

        assert_eq!(report.repo.names(), vec!["a"]);
        assert_eq!(report.foreign.names(), vec!["b"]);
        assert_eq!(report.foreign.get(0).unwrap().source, UpgradeSource::Aur);
        assert!(report.errors.is_empty());
        assert_eq!(report.totals(), ListTotals::new(1, 1));
    }

    #[tokio::test]
    async fn test_installed_failure_is_fatal() {
        let db = FakeDb {
            installed: Err(SourceError::local_db("locked")),
            sync: Ok(vec![]),
        };
        let sources = sources(db, basic_index(), Arc::default());
        let err = list_upgrades(&sources, UpgradeOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err, SourceError::local_db("locked"));
    }

    #[tokio::test]
    async fn test_foreign_failure_keeps_repo_results() {
        let index = FakeIndex(Err(SourceError::timeout("fake")));
        let sources = sources(basic_db(), index, Arc::default());
        let report = list_upgrades(&sources, UpgradeOptions::default())
            .await
            .unwrap();

        assert_eq!(report.repo.names(), vec!["a"]);
        assert!(report.foreign.is_empty());
        assert_eq!(report.errors, vec![SourceError::timeout("fake")]);
    }

    #[tokio::test]
    async fn test_sync_failure_keeps_foreign_results() {
        let mut db = basic_db();
        db.sync = Err(SourceError::command_failed("pacman -Sl", "boom"));
        let sources = sources(db, basic_index(), Arc::default());
        let report = list_upgrades(&sources, UpgradeOptions::default())
            .await
            .unwrap();

        assert!(report.repo.is_empty());
        assert_eq!(report.foreign.names(), vec!["b"]);
        assert_eq!(report.errors.len(), 1);
        assert!(report.has_errors());
    }

    #[tokio::test]
    async fn test_repo_list_sorted_by_repository_descending() {
        let db = FakeDb {
            installed: Ok(vec![
                InstalledPackage::new("a", "1-1"),
                InstalledPackage::new("b", "1-1"),
                InstalledPackage::new("c", "1-1"),
            ]),
            sync: Ok(vec![
                SyncPackage::new("core", "a", "2-1"),
                SyncPackage::new("extra", "b", "2-1"),
                SyncPackage::new("multilib", "c", "2-1"),
            ]),
        };
        let sources = sources(db, FakeIndex(Ok(vec![])), Arc::default());
        let report = list_upgrades(&sources, UpgradeOptions::default())
            .await
            .unwrap();
        assert_eq!(report.repo.names(), vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_ignored_upgrades_are_reported() {
        let db = FakeDb {
            installed: Ok(vec![
                InstalledPackage::new("a", "1.0-1").ignored(),
                InstalledPackage::new("b", "2.0-1").foreign().ignored(),
            ]),
            sync: Ok(vec![SyncPackage::new("core", "a", "1.0-2")]),
        };
        let sources = sources(db, basic_index(), Arc::default());
        let report = list_upgrades(&sources, UpgradeOptions::default())
            .await
            .unwrap();

        assert!(report.is_empty());
        assert_eq!(
            report.ignored,
            vec![
                IgnoredUpgrade::new("a", "1.0-1", "1.0-2"),
                IgnoredUpgrade::new("b", "2.0-1", "2.1-1"),
            ]
        );
    }

    #[tokio::test]
    async fn test_time_update() {
        let db = FakeDb {
            installed: Ok(vec![InstalledPackage::new("b", "2.1-1")
                .foreign()
                .with_build_date(when(1))]),
            sync: Ok(vec![]),
        };
        let index = FakeIndex(Ok(vec![ForeignPackage::new("b", "2.1-1", when(5))]));
        let sources = sources(db, index, Arc::default());

        let plain = list_upgrades(&sources, UpgradeOptions::default())
            .await
            .unwrap();
        assert!(plain.foreign.is_empty());

        let timed = list_upgrades(&sources, UpgradeOptions::default().with_time_update(true))
            .await
            .unwrap();
        assert_eq!(timed.foreign.names(), vec!["b"]);
    }

    fn devel_vcs() -> Arc<FakeVcs> {
        let mut entries = BTreeMap::new();
        entries.insert("tool-git".to_string(), VcsInfo::new("u", "HEAD", "old"));
        entries.insert("fresh-git".to_string(), VcsInfo::new("u", "HEAD", "new"));
        entries.insert("held-git".to_string(), VcsInfo::new("u", "HEAD", "old"));
        entries.insert("gone-git".to_string(), VcsInfo::new("u", "HEAD", "old"));
        Arc::new(FakeVcs {
            entries,
            removed: Mutex::default(),
        })
    }

    fn devel_db() -> FakeDb {
        FakeDb {
            installed: Ok(vec![
                InstalledPackage::new("tool-git", "r10.abc-1").foreign(),
                InstalledPackage::new("fresh-git", "r3.def-1").foreign(),
                InstalledPackage::new("held-git", "r1.aaa-1").foreign().ignored(),
            ]),
            sync: Ok(vec![]),
        }
    }

    #[tokio::test]
    async fn test_devel_disabled_skips_vcs() {
        let vcs = devel_vcs();
        let sources = sources(devel_db(), FakeIndex(Ok(vec![])), vcs.clone());
        let report = list_upgrades(&sources, UpgradeOptions::default())
            .await
            .unwrap();
        assert!(report.foreign.is_empty());
        assert!(vcs.removed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_devel_upgrades() {
        let vcs = devel_vcs();
        let sources = sources(devel_db(), FakeIndex(Ok(vec![])), vcs.clone());
        let report = list_upgrades(&sources, UpgradeOptions::default().with_devel(true))
            .await
            .unwrap();

        assert_eq!(report.foreign.names(), vec!["tool-git"]);
        let upgrade = report.foreign.get(0).unwrap();
        assert_eq!(upgrade.source, UpgradeSource::Devel);
        assert_eq!(upgrade.remote_version, LATEST_COMMIT);
        assert_eq!(
            report.ignored,
            vec![IgnoredUpgrade::new("held-git", "r1.aaa-1", LATEST_COMMIT)]
        );
        assert_eq!(*vcs.removed.lock().unwrap(), vec!["gone-git".to_string()]);
    }

    #[tokio::test]
    async fn test_foreign_failure_keeps_devel_upgrades() {
        let vcs = devel_vcs();
        let index = FakeIndex(Err(SourceError::timeout("fake")));
        let sources = sources(devel_db(), index, vcs);
        let report = list_upgrades(&sources, UpgradeOptions::default().with_devel(true))
            .await
            .unwrap();

        assert_eq!(report.foreign.names(), vec!["tool-git"]);
        assert_eq!(report.foreign.get(0).unwrap().source, UpgradeSource::Devel);
        assert_eq!(report.errors, vec![SourceError::timeout("fake")]);
    }

    #[tokio::test]
    async fn test_devel_and_aur_upgrade_are_deduplicated() {
        let vcs = devel_vcs();
        let index = FakeIndex(Ok(vec![ForeignPackage::new("tool-git", "r11.bcd-1", when(1))]));
        let sources = sources(devel_db(), index, vcs);
        let report = list_upgrades(&sources, UpgradeOptions::default().with_devel(true))
            .await
            .unwrap();

        assert_eq!(report.foreign.names(), vec!["tool-git"]);
    }
}
