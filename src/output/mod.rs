//! Output formatting for upgrade reports
//!
//! This module provides:
//! - Text output: the numbered upgrade list, ignore warnings and the plan
//! - JSON output for machine processing

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::cli::CliArgs;
use crate::selection::UpgradeTargets;
use crate::upgrade::UpgradeReport;
use std::io::Write;

/// Output format selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Numbered list, prompt and plan
    Text,
    /// One JSON document, no prompt
    Json,
}

/// How much the formatters print besides the list and the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Ignore warnings suppressed
    Quiet,
    Normal,
}

/// Configuration for output formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub verbosity: Verbosity,
    /// Whether ANSI colors are written
    pub color: bool,
}

impl OutputConfig {
    /// Derive the output settings from the command line
    pub fn from_args(args: &CliArgs) -> Self {
        Self {
            format: if args.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            verbosity: if args.quiet {
                Verbosity::Quiet
            } else {
                Verbosity::Normal
            },
            color: !args.no_color,
        }
    }
}

/// Trait for output formatters
///
/// The list is written before the user is prompted, the plan after the
/// selection was resolved.
pub trait OutputFormatter {
    /// Write the upgrade list and any ignore warnings
    fn format_upgrades(&self, report: &UpgradeReport, writer: &mut dyn Write)
        -> std::io::Result<()>;

    /// Write the names that will be upgraded
    fn format_plan(
        &self,
        report: &UpgradeReport,
        targets: &UpgradeTargets,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(config.verbosity, config.color)),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.verbosity)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(argv: &[&str]) -> OutputConfig {
        let args = CliArgs::parse_from(std::iter::once("aurup").chain(argv.iter().copied()));
        OutputConfig::from_args(&args)
    }

    #[test]
    fn test_defaults_to_colored_text() {
        assert_eq!(
            config(&[]),
            OutputConfig {
                format: OutputFormat::Text,
                verbosity: Verbosity::Normal,
                color: true,
            }
        );
    }

    #[test]
    fn test_json_flag() {
        assert_eq!(config(&["--json"]).format, OutputFormat::Json);
    }

    #[test]
    fn test_quiet_flag() {
        assert_eq!(config(&["-q"]).verbosity, Verbosity::Quiet);
        assert_eq!(config(&["--verbose"]).verbosity, Verbosity::Normal);
    }

    #[test]
    fn test_no_color_flag() {
        assert!(!config(&["--no-color"]).color);
    }

    #[test]
    fn test_create_formatter_json_writes_plan_only() {
        let formatter = create_formatter(config(&["--json"]));
        let report = UpgradeReport::default();
        let mut out = Vec::new();
        formatter.format_upgrades(&report, &mut out).unwrap();
        assert!(out.is_empty());

        formatter
            .format_plan(&report, &UpgradeTargets::default(), &mut out)
            .unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with('{'));
    }
}
