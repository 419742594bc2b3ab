//! JSON output formatter for machine processing
//!
//! The whole run is written as one document by [`OutputFormatter::format_plan`]:
//! numbered upgrades, ignored upgrades, source errors and the plan.

use crate::domain::{IgnoredUpgrade, Upgrade};
use crate::output::{OutputFormatter, Verbosity};
use crate::selection::{Target, UpgradeTargets};
use crate::upgrade::UpgradeReport;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Sync database upgrades
    repo: Vec<JsonUpgrade<'a>>,
    /// AUR and devel upgrades
    foreign: Vec<JsonUpgrade<'a>>,
    /// Upgrades withheld by ignore rules (omitted in quiet mode)
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    ignored: &'a [IgnoredUpgrade],
    /// Names selected for upgrade
    plan: &'a UpgradeTargets,
    /// Sources that failed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// JSON representation of one numbered upgrade
#[derive(Serialize)]
struct JsonUpgrade<'a> {
    /// Number shown in the interactive list
    number: usize,
    #[serde(flatten)]
    upgrade: &'a Upgrade,
}

impl JsonFormatter {
    fn to_json<'a>(&self, report: &'a UpgradeReport, targets: &'a UpgradeTargets) -> JsonOutput<'a> {
        let totals = report.totals();
        let numbered = |target: Target, upgrade: &'a Upgrade| JsonUpgrade {
            number: totals.display(target).unwrap_or_default(),
            upgrade,
        };

        let ignored: &[IgnoredUpgrade] = if self.verbosity == Verbosity::Quiet {
            &[]
        } else {
            &report.ignored
        };

        JsonOutput {
            repo: report
                .repo
                .iter()
                .enumerate()
                .map(|(i, u)| numbered(Target::Repo(i), u))
                .collect(),
            foreign: report
                .foreign
                .iter()
                .enumerate()
                .map(|(i, u)| numbered(Target::Foreign(i), u))
                .collect(),
            ignored,
            plan: targets,
            errors: report.errors.iter().map(ToString::to_string).collect(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_upgrades(
        &self,
        _report: &UpgradeReport,
        _writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        Ok(())
    }

    fn format_plan(
        &self,
        report: &UpgradeReport,
        targets: &UpgradeTargets,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let output = self.to_json(report, targets);
        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }
}
