//! Text output formatter for human-readable display
//!
//! This module provides:
//! - The numbered upgrade list, sync database upgrades first
//! - Release-only vs upstream version changes via [`crate::version::diff`]
//! - Warnings for upgrades withheld by ignore rules
//! - The resolved upgrade plan

use crate::domain::{IgnoredUpgrade, Upgrade};
use crate::output::{OutputFormatter, Verbosity};
use crate::selection::{ListTotals, Target, UpgradeTargets};
use crate::upgrade::UpgradeReport;
use crate::version::diff;
use colored::{ColoredString, Colorize};
use std::collections::BTreeSet;
use std::io::Write;

/// Column the version pair is aligned against
const LINE_WIDTH: usize = 70;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// The `::` marker leading section headers
    fn marker(&self) -> String {
        self.paint("::", |s| s.blue().bold())
    }

    /// One numbered list line
    ///
    /// The `left -> right` pair plus its line break is right-aligned in a
    /// field of `70 - len(repo) - len(name) + len(left)` columns.
    pub fn format_line(&self, number: usize, upgrade: &Upgrade) -> String {
        let (left, right) = diff(&upgrade.local_version, &upgrade.remote_version);
        let repo = upgrade.source.label();
        let (left_plain, right_plain) = (left.plain(), right.plain());

        let width = (LINE_WIDTH + left_plain.len()).saturating_sub(repo.len() + upgrade.name.len());
        let pair_len = left_plain.len() + " -> ".len() + right_plain.len() + 1;
        let pad = width.saturating_sub(pair_len);

        format!(
            "{} {}/{}{}{} -> {}",
            self.paint(&format!("{:2}", number), |s| s.magenta()),
            self.paint(repo, |s| s.bold()),
            self.paint(&upgrade.name, |s| s.cyan()),
            " ".repeat(pad),
            left.render(self.color),
            right.render(self.color),
        )
    }

    /// Warning for an upgrade withheld by ignore rules
    pub fn format_ignored(&self, ignored: &IgnoredUpgrade) -> String {
        format!(
            "{} {} ignoring package upgrade ({} => {})",
            self.paint("Warning:", |s| s.magenta()),
            self.paint(&ignored.name, |s| s.cyan()),
            ignored.local_version,
            ignored.remote_version,
        )
    }

    /// Question shown before reading the selection line
    pub fn format_prompt(&self) -> String {
        format!(
            "{} {}\n{} ",
            self.marker(),
            self.paint("Packages to upgrade (eg: 1 2 3, 1-3 or ^4)", |s| s.bold()),
            self.paint("==>", |s| s.green().bold()),
        )
    }

    fn format_names(&self, label: &str, names: &BTreeSet<String>) -> String {
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        format!(
            "{} {} ({}): {}",
            self.marker(),
            self.paint(label, |s| s.bold()),
            names.len(),
            names.join(" ")
        )
    }
}

impl OutputFormatter for TextFormatter {
    fn format_upgrades(
        &self,
        report: &UpgradeReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let quiet = self.verbosity == Verbosity::Quiet;

        if !quiet {
            for ignored in &report.ignored {
                writeln!(writer, "{}", self.format_ignored(ignored))?;
            }
        }

        if report.is_empty() {
            if !quiet {
                writeln!(writer, " there is nothing to do")?;
            }
            return Ok(());
        }

        let totals: ListTotals = report.totals();
        if !quiet {
            writeln!(
                writer,
                "{} {}",
                self.marker(),
                self.paint(&format!("{} Packages to upgrade.", totals.total()), |s| s.bold())
            )?;
        }

        let repo = report.repo.iter().enumerate().map(|(i, u)| (Target::Repo(i), u));
        let foreign = report
            .foreign
            .iter()
            .enumerate()
            .map(|(i, u)| (Target::Foreign(i), u));

        for (target, upgrade) in repo.chain(foreign) {
            if let Some(number) = totals.display(target) {
                writeln!(writer, "{}", self.format_line(number, upgrade))?;
            }
        }

        Ok(())
    }

    fn format_plan(
        &self,
        report: &UpgradeReport,
        targets: &UpgradeTargets,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if targets.is_empty() {
            if self.verbosity != Verbosity::Quiet {
                writeln!(writer, " nothing selected")?;
            }
        } else {
            if !targets.repo.is_empty() {
                writeln!(writer, "{}", self.format_names("Repository", &targets.repo))?;
            }
            if !targets.foreign.is_empty() {
                writeln!(writer, "{}", self.format_names("AUR", &targets.foreign))?;
            }
        }

        if report.has_errors() && self.verbosity != Verbosity::Quiet {
            writeln!(
                writer,
                "{} {} source(s) failed, the list may be incomplete",
                self.paint("Warning:", |s| s.yellow()),
                report.errors.len()
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UpgradeList, UpgradeSource};
    use crate::error::SourceError;

    fn report() -> UpgradeReport {
        UpgradeReport {
            repo: UpgradeList::from(vec![Upgrade::new(
                "a",
                UpgradeSource::Repo("core".into()),
                "1.0-1",
                "1.0-2",
            )]),
            foreign: UpgradeList::from(vec![
                Upgrade::new("b", UpgradeSource::Aur, "2.0-1", "2.1-1"),
                Upgrade::devel("c-git", "r5.abc-1"),
            ]),
            ..Default::default()
        }
    }

    fn render(formatter: &TextFormatter, report: &UpgradeReport) -> String {
        let mut out = Vec::new();
        formatter.format_upgrades(report, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_format_line_alignment() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        let upgrade = Upgrade::new("a", UpgradeSource::Repo("core".into()), "1.0-1", "1.0-2");
        let line = formatter.format_line(2, &upgrade);

        // width = 70 - 4 - 1 + 5 = 70, pair and newline = 15, so 55 spaces
        let expected = format!(" 2 core/a{}1.0-1 -> 1.0-2", " ".repeat(55));
        assert_eq!(line, expected);
    }

    #[test]
    fn test_format_line_long_name_does_not_underflow() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        let upgrade = Upgrade::new("x".repeat(100), UpgradeSource::Aur, "1-1", "2-1");
        let line = formatter.format_line(10, &upgrade);
        assert!(line.starts_with("10 aur/"));
        assert!(line.ends_with("1-1 -> 2-1"));
    }

    #[test]
    fn test_format_upgrades_numbering() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        let out = render(&formatter, &report());
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], ":: 3 Packages to upgrade.");
        assert!(lines[1].starts_with(" 3 core/a "));
        assert!(lines[2].starts_with(" 2 aur/b "));
        assert!(lines[3].starts_with(" 1 devel/c-git "));
        assert!(lines[3].ends_with("r5.abc-1 -> latest-commit"));
    }

    #[test]
    fn test_format_upgrades_quiet_has_no_header() {
        let formatter = TextFormatter::with_color(Verbosity::Quiet, false);
        let out = render(&formatter, &report());
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn test_format_upgrades_nothing_to_do() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        let out = render(&formatter, &UpgradeReport::default());
        assert_eq!(out, " there is nothing to do\n");
    }

    #[test]
    fn test_format_ignored_warning() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        let mut report = UpgradeReport::default();
        report
            .ignored
            .push(IgnoredUpgrade::new("linux", "6.8.9-1", "6.9.1-1"));

        let out = render(&formatter, &report);
        assert_eq!(
            out.lines().next().unwrap(),
            "Warning: linux ignoring package upgrade (6.8.9-1 => 6.9.1-1)"
        );
    }

    #[test]
    fn test_format_plan() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        let targets = UpgradeTargets {
            repo: ["a".to_string()].into_iter().collect(),
            foreign: ["b".to_string(), "c-git".to_string()].into_iter().collect(),
        };

        let mut out = Vec::new();
        formatter.format_plan(&report(), &targets, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out, ":: Repository (1): a\n:: AUR (2): b c-git\n");
    }

    #[test]
    fn test_format_plan_nothing_selected_with_errors() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        let mut report = UpgradeReport::default();
        report.errors.push(SourceError::timeout("AUR"));

        let mut out = Vec::new();
        formatter
            .format_plan(&report, &UpgradeTargets::default(), &mut out)
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with(" nothing selected\n"));
        assert!(out.contains("1 source(s) failed"));
    }

    #[test]
    fn test_format_prompt_plain() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        assert_eq!(
            formatter.format_prompt(),
            ":: Packages to upgrade (eg: 1 2 3, 1-3 or ^4)\n==> "
        );
    }
}
