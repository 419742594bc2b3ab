//! Turning a selection into package names

use super::index::{ListTotals, Target};
use crate::domain::UpgradeList;
use serde::Serialize;
use std::collections::BTreeSet;

/// Final per-list exclusion sets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    excluded_foreign: BTreeSet<usize>,
    excluded_repo: BTreeSet<usize>,
}

impl Selection {
    /// A selection that keeps every entry
    pub fn all() -> Self {
        Self::default()
    }

    /// Build the exclusion sets as the complement of the selected indices
    pub fn from_selected(
        totals: ListTotals,
        foreign: &BTreeSet<usize>,
        repo: &BTreeSet<usize>,
    ) -> Self {
        Self {
            excluded_foreign: (0..totals.foreign).filter(|i| !foreign.contains(i)).collect(),
            excluded_repo: (0..totals.repo).filter(|i| !repo.contains(i)).collect(),
        }
    }

    pub fn excluded_foreign(&self) -> &BTreeSet<usize> {
        &self.excluded_foreign
    }

    pub fn excluded_repo(&self) -> &BTreeSet<usize> {
        &self.excluded_repo
    }

    /// Whether the entry at `target` is upgraded
    pub fn is_selected(&self, target: Target) -> bool {
        match target {
            Target::Foreign(i) => !self.excluded_foreign.contains(&i),
            Target::Repo(i) => !self.excluded_repo.contains(&i),
        }
    }
}

/// Names handed to the installer, one set per source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpgradeTargets {
    /// Packages upgraded from the sync databases
    pub repo: BTreeSet<String>,
    /// Packages rebuilt from the AUR
    pub foreign: BTreeSet<String>,
}

impl UpgradeTargets {
    pub fn is_empty(&self) -> bool {
        self.repo.is_empty() && self.foreign.is_empty()
    }

    pub fn len(&self) -> usize {
        self.repo.len() + self.foreign.len()
    }
}

/// Walk both lists and keep every entry the selection does not exclude
pub fn resolve_targets(
    repo: &UpgradeList,
    foreign: &UpgradeList,
    selection: &Selection,
) -> UpgradeTargets {
    let repo_names = repo
        .iter()
        .enumerate()
        .filter(|(i, _)| selection.is_selected(Target::Repo(*i)))
        .map(|(_, u)| u.name.clone())
        .collect();

    let foreign_names = foreign
        .iter()
        .enumerate()
        .filter(|(i, _)| selection.is_selected(Target::Foreign(*i)))
        .map(|(_, u)| u.name.clone())
        .collect();

    UpgradeTargets {
        repo: repo_names,
        foreign: foreign_names,
    }
}
