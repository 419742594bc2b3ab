//! Mapping between display numbers and list positions
//!
//! The repo list is printed first and the foreign list last, numbered in
//! reverse so that `1` is the final line right above the prompt:
//!
//! ```text
//!  F+L  repo[0]
//!  ...
//!  F+1  repo[L-1]
//!  F    foreign[0]
//!  ...
//!  1    foreign[F-1]
//! ```

/// Lengths of the two displayed lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListTotals {
    /// Number of foreign (AUR and devel) upgrades
    pub foreign: usize,
    /// Number of sync database upgrades
    pub repo: usize,
}

/// A position in one of the two lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Foreign(usize),
    Repo(usize),
}

impl ListTotals {
    pub fn new(foreign: usize, repo: usize) -> Self {
        Self { foreign, repo }
    }

    /// Total number of displayed lines
    pub fn total(&self) -> usize {
        self.foreign + self.repo
    }

    /// Resolve a display number, None when it is outside `1..=total`
    pub fn target(&self, display: usize) -> Option<Target> {
        if display == 0 || display > self.total() {
            None
        } else if display <= self.foreign {
            Some(Target::Foreign(self.foreign - display))
        } else {
            Some(Target::Repo(self.total() - display))
        }
    }

    /// Display number for a list position, None when the index is out of range
    pub fn display(&self, target: Target) -> Option<usize> {
        match target {
            Target::Foreign(i) if i < self.foreign => Some(self.foreign - i),
            Target::Repo(i) if i < self.repo => Some(self.total() - i),
            _ => None,
        }
    }
}
