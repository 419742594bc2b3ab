//! Display-oriented version differences
//!
//! This module provides:
//! - Emphasis markers attached to version text segments
//! - `diff`, which decides whether an upgrade is a rebuild (release only)
//!   or an upstream bump and marks the changed part accordingly

use super::CompleteVersion;
use colored::Colorize;

/// Marker shown in place of a version that does not parse
pub const INVALID_VERSION: &str = "Invalid Version";

/// How a segment of version text should be emphasized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Unchanged text
    Plain,
    /// Changed text on the installed side
    Old,
    /// Changed text on the candidate side
    New,
    /// Changed upstream version on the candidate side
    NewStrong,
    /// The invalid version marker
    Invalid,
}

/// One piece of version text with its emphasis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub emphasis: Emphasis,
}

impl Segment {
    fn new(text: impl Into<String>, emphasis: Emphasis) -> Self {
        Self {
            text: text.into(),
            emphasis,
        }
    }
}

/// One side of a version diff
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionDisplay {
    segments: Vec<Segment>,
}

impl VersionDisplay {
    fn invalid() -> Self {
        Self {
            segments: vec![Segment::new(INVALID_VERSION, Emphasis::Invalid)],
        }
    }

    fn from_parts(
        version: String,
        version_emphasis: Emphasis,
        release: &str,
        release_emphasis: Emphasis,
    ) -> Self {
        let mut segments = vec![Segment::new(version, version_emphasis)];
        if !release.is_empty() {
            segments.push(Segment::new("-", Emphasis::Plain));
            segments.push(Segment::new(release, release_emphasis));
        }
        Self { segments }
    }

    /// The segments making up this side
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether this side is the invalid marker
    pub fn is_invalid(&self) -> bool {
        self.segments
            .iter()
            .any(|s| s.emphasis == Emphasis::Invalid)
    }

    /// Text without any styling
    pub fn plain(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Text with terminal styling applied when `color` is set
    pub fn render(&self, color: bool) -> String {
        if !color {
            return self.plain();
        }
        self.segments
            .iter()
            .map(|s| match s.emphasis {
                Emphasis::Plain => s.text.clone(),
                Emphasis::Old | Emphasis::Invalid => s.text.red().to_string(),
                Emphasis::New => s.text.green().to_string(),
                Emphasis::NewStrong => s.text.green().bold().to_string(),
            })
            .collect()
    }
}

/// Compute the display pair for an upgrade from `old` to `new`
pub fn diff(old: &str, new: &str) -> (VersionDisplay, VersionDisplay) {
    let old = CompleteVersion::parse(old);
    let new = CompleteVersion::parse(new);

    if let (Some(o), Some(n)) = (&old, &new) {
        if o.same_upstream(n) {
            return (rebuild(o, Emphasis::Old), rebuild(n, Emphasis::New));
        }
    }

    (
        old.map(|o| bump(&o, Emphasis::Old))
            .unwrap_or_else(VersionDisplay::invalid),
        new.map(|n| bump(&n, Emphasis::NewStrong))
            .unwrap_or_else(VersionDisplay::invalid),
    )
}

/// Same upstream version, only the release is marked
fn rebuild(v: &CompleteVersion, release_emphasis: Emphasis) -> VersionDisplay {
    VersionDisplay::from_parts(
        v.epoch_version(),
        Emphasis::Plain,
        &v.release,
        release_emphasis,
    )
}

/// Upstream version changed, the whole version is marked
fn bump(v: &CompleteVersion, version_emphasis: Emphasis) -> VersionDisplay {
    VersionDisplay::from_parts(
        v.epoch_version(),
        version_emphasis,
        &v.release,
        Emphasis::Plain,
    )
}
