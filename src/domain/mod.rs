//! Core domain models for aurup
//!
//! This module contains the fundamental types used throughout the application:
//! - Installed, sync and foreign package records
//! - Upgrade records and per-source upgrade lists
//! - Ignored upgrades reported as warnings

mod package;
mod upgrade;

pub use package::{ForeignPackage, InstalledPackage, SyncPackage};
pub use upgrade::{IgnoredUpgrade, Upgrade, UpgradeList, UpgradeSource, LATEST_COMMIT};
