//! IgnorePkg / IgnoreGroup matching

use serde::{Deserialize, Serialize};

/// Package and group patterns whose upgrades are withheld
///
/// Patterns follow pacman's shell-style globbing: `*` matches any run of
/// characters and `?` a single character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreRules {
    pub packages: Vec<String>,
    pub groups: Vec<String>,
}

impl IgnoreRules {
    pub fn new(packages: Vec<String>, groups: Vec<String>) -> Self {
        Self { packages, groups }
    }

    /// Add package patterns
    pub fn with_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages.extend(packages.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.groups.is_empty()
    }

    /// Whether a package with this name and these groups is ignored
    pub fn is_ignored(&self, name: &str, groups: &[String]) -> bool {
        self.packages.iter().any(|p| glob_match(p, name))
            || groups
                .iter()
                .any(|g| self.groups.iter().any(|p| glob_match(p, g)))
    }
}

fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                star = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match star {
                // Let the last star swallow one more character.
                Some((sp, st)) => {
                    p = sp + 1;
                    t = st + 1;
                    star = Some((sp, st + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
