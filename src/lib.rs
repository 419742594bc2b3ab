//! aurup - Interactive upgrade selector library
//!
//! This library provides the core functionality for selecting package
//! upgrades on Arch based systems:
//! - Concurrent discovery of sync database, AUR and devel upgrades
//! - A single reverse-numbered list across both sources
//! - Range selection (`3`, `1-4`, `^2`) resolved into per-source name sets

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod output;
pub mod progress;
pub mod selection;
pub mod source;
pub mod upgrade;
pub mod version;
