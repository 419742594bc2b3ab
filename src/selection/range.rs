//! Selection token parsing
//!
//! Accepted tokens:
//! - `3`: a single display number
//! - `1-4` or `4-1`: an inclusive range, in either direction
//! - `^3`, `^1-4`: the same, excluding instead of including
//!
//! Anything else is skipped, as are numbers outside the displayed range.

use super::index::{ListTotals, Target};
use super::resolve::Selection;
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// Include and exclude sets exactly as the user typed them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSelection {
    pub include_foreign: BTreeSet<usize>,
    pub include_repo: BTreeSet<usize>,
    pub exclude_foreign: BTreeSet<usize>,
    pub exclude_repo: BTreeSet<usize>,
}

impl RawSelection {
    /// Whether any positive selection was made in either list
    pub fn has_includes(&self) -> bool {
        !self.include_foreign.is_empty() || !self.include_repo.is_empty()
    }

    /// Apply the selection policy and produce the final exclusion sets
    ///
    /// Without any positive selection every entry starts selected, so a
    /// blank line upgrades everything and `^N` means "all but N".
    /// Exclusions are then removed from each list's selected set.
    pub fn resolve(self, totals: ListTotals) -> Selection {
        let (mut foreign, mut repo) = if self.has_includes() {
            (self.include_foreign, self.include_repo)
        } else {
            ((0..totals.foreign).collect(), (0..totals.repo).collect())
        };

        foreign.retain(|i| !self.exclude_foreign.contains(i));
        repo.retain(|i| !self.exclude_repo.contains(i));

        Selection::from_selected(totals, &foreign, &repo)
    }

    fn insert(&mut self, target: Target, negate: bool) {
        let set = match (target, negate) {
            (Target::Foreign(_), false) => &mut self.include_foreign,
            (Target::Repo(_), false) => &mut self.include_repo,
            (Target::Foreign(_), true) => &mut self.exclude_foreign,
            (Target::Repo(_), true) => &mut self.exclude_repo,
        };
        match target {
            Target::Foreign(i) | Target::Repo(i) => set.insert(i),
        };
    }
}

/// Parse selection tokens against the displayed list lengths
pub fn parse_selection<S: AsRef<str>>(tokens: &[S], totals: ListTotals) -> RawSelection {
    let mut raw = RawSelection::default();

    for token in tokens {
        let Some((negate, range)) = parse_token(token.as_ref()) else {
            continue;
        };

        // Clamp before iterating so huge ranges stay cheap.
        let start = (*range.start()).max(1);
        let end = (*range.end()).min(totals.total());
        for display in start..=end {
            if let Some(target) = totals.target(display) {
                raw.insert(target, negate);
            }
        }
    }

    raw
}

/// Split a token into its negation flag and display range
fn parse_token(token: &str) -> Option<(bool, RangeInclusive<usize>)> {
    let (negate, body) = match token.strip_prefix('^') {
        Some(rest) => (true, rest),
        None => (false, token),
    };

    if let Ok(n) = body.parse::<usize>() {
        return Some((negate, n..=n));
    }

    build_range(body).map(|range| (negate, range))
}

/// Parse `A-B` into an ascending inclusive range
pub fn build_range(s: &str) -> Option<RangeInclusive<usize>> {
    let (a, b) = s.split_once('-')?;
    let a: usize = a.parse().ok()?;
    let b: usize = b.parse().ok()?;
    Some(a.min(b)..=a.max(b))
}
