//! Package version handling
//!
//! This module provides:
//! - Version ordering for `[epoch:]version[-release]` strings
//! - Parsing into epoch, version and release components
//! - Display diffs that highlight what changed between two versions

mod compare;
mod complete;
mod diff;

pub use compare::{segment_cmp, vercmp};
pub use complete::CompleteVersion;
pub use diff::{diff, Emphasis, Segment, VersionDisplay, INVALID_VERSION};

use std::cmp::Ordering;

/// Whether `candidate` is strictly newer than `installed`
pub fn is_newer(installed: &str, candidate: &str) -> bool {
    vercmp(installed, candidate) == Ordering::Less
}
