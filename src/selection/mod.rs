//! Interactive upgrade selection
//!
//! This module provides:
//! - The display number ↔ list position mapping
//! - Parsing of selection tokens (`3`, `1-4`, `^2`)
//! - The include/exclude policy and name resolution
//! - Reading the selection line from standard input

mod index;
mod input;
mod range;
mod resolve;

pub use index::{ListTotals, Target};
pub use input::{read_selection, MAX_LINE_LEN};
pub use range::{build_range, parse_selection, RawSelection};
pub use resolve::{resolve_targets, Selection, UpgradeTargets};
