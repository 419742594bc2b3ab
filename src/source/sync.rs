//! Index of packages available from the sync databases

use crate::domain::{InstalledPackage, SyncPackage};
use crate::version::is_newer;
use std::collections::HashMap;

/// Sync packages in configured database order
///
/// When several databases carry the same name, the first one is
/// authoritative.
#[derive(Debug, Clone, Default)]
pub struct SyncIndex {
    packages: Vec<SyncPackage>,
    by_name: HashMap<String, usize>,
}

impl SyncIndex {
    pub fn new(packages: Vec<SyncPackage>) -> Self {
        let mut by_name = HashMap::with_capacity(packages.len());
        for (i, package) in packages.iter().enumerate() {
            by_name.entry(package.name.clone()).or_insert(i);
        }
        Self { packages, by_name }
    }

    /// The authoritative sync entry for `name`
    pub fn get(&self, name: &str) -> Option<&SyncPackage> {
        self.by_name.get(name).map(|&i| &self.packages[i])
    }

    /// The sync entry for `installed` if it carries a strictly newer version
    pub fn newer_version(&self, installed: &InstalledPackage) -> Option<&SyncPackage> {
        self.get(&installed.name)
            .filter(|sync| is_newer(&installed.version, &sync.version))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl FromIterator<SyncPackage> for SyncIndex {
    fn from_iter<I: IntoIterator<Item = SyncPackage>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SyncIndex {
        vec![
            SyncPackage::new("core", "bash", "5.2.026-2"),
            SyncPackage::new("extra", "vim", "9.1-1"),
            SyncPackage::new("testing", "bash", "5.3-1"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_first_database_wins() {
        let index = index();
        assert_eq!(index.get("bash").unwrap().db, "core");
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_newer_version() {
        let index = index();
        let old = InstalledPackage::new("bash", "5.2.021-1");
        assert_eq!(index.newer_version(&old).unwrap().version, "5.2.026-2");

        let current = InstalledPackage::new("bash", "5.2.026-2");
        assert!(index.newer_version(&current).is_none());
    }

    #[test]
    fn test_newer_version_ignores_later_databases() {
        // testing carries 5.3 but core is authoritative
        let index = index();
        let installed = InstalledPackage::new("bash", "5.2.026-2");
        assert!(index.newer_version(&installed).is_none());
    }

    #[test]
    fn test_lookup_by_name() {
        let index = index();
        assert_eq!(index.get("vim").unwrap().version, "9.1-1");
        assert!(index.get("yay").is_none());
        assert!(SyncIndex::default().is_empty());
    }
}
