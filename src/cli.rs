//! CLI argument parsing module for aurup

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Interactive upgrade selector for pacman and the AUR
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "aurup",
    version,
    about = "Interactive upgrade selector for pacman and the AUR"
)]
pub struct CliArgs {
    // Upgrade discovery
    /// Check development (VCS) packages for new upstream commits
    #[arg(long)]
    pub devel: bool,

    /// Treat a newer AUR modification time as an upgrade
    #[arg(long = "timeupdate")]
    pub time_update: bool,

    /// Ignore upgrades for a package (can be specified multiple times)
    #[arg(long, action = ArgAction::Append, value_name = "PKG")]
    pub ignore: Vec<String>,

    // Prompt
    /// Do not ask which packages to upgrade; select everything
    #[arg(long)]
    pub noconfirm: bool,

    // Locations
    /// pacman database directory
    #[arg(long, value_name = "PATH")]
    pub dbpath: Option<PathBuf>,

    /// pacman configuration file
    #[arg(long, value_name = "PATH")]
    pub pacman_conf: Option<PathBuf>,

    /// VCS metadata file for development packages
    #[arg(long, value_name = "PATH")]
    pub vcs_file: Option<PathBuf>,

    /// AUR base URL
    #[arg(long, value_name = "URL")]
    pub aur_url: Option<String>,

    /// Configuration file (default: $XDG_CONFIG_HOME/aurup/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // Output options
    /// Output the upgrade report and plan as JSON without prompting
    #[arg(long)]
    pub json: bool,

    /// Log per-source progress to stderr
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl CliArgs {
    /// Whether the selection prompt should be shown
    pub fn should_prompt(&self) -> bool {
        !self.noconfirm && !self.json
    }

    /// Whether the progress spinner should be shown
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["aurup"]);
        assert!(!args.devel);
        assert!(!args.time_update);
        assert!(args.ignore.is_empty());
        assert!(!args.noconfirm);
        assert!(args.dbpath.is_none());
        assert!(args.pacman_conf.is_none());
        assert!(args.vcs_file.is_none());
        assert!(args.aur_url.is_none());
        assert!(args.config.is_none());
        assert!(!args.json);
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(!args.no_color);
    }

    #[test]
    fn test_upgrade_flags() {
        let args = CliArgs::parse_from(["aurup", "--devel", "--timeupdate"]);
        assert!(args.devel);
        assert!(args.time_update);
    }

    #[test]
    fn test_ignore_multiple() {
        let args = CliArgs::parse_from(["aurup", "--ignore", "linux", "--ignore", "yay-git"]);
        assert_eq!(args.ignore, vec!["linux", "yay-git"]);
    }

    #[test]
    fn test_paths() {
        let args = CliArgs::parse_from([
            "aurup",
            "--dbpath",
            "/tmp/db",
            "--pacman-conf",
            "/tmp/pacman.conf",
            "--vcs-file",
            "/tmp/vcs.json",
            "--config",
            "/tmp/aurup.toml",
        ]);
        assert_eq!(args.dbpath, Some(PathBuf::from("/tmp/db")));
        assert_eq!(args.pacman_conf, Some(PathBuf::from("/tmp/pacman.conf")));
        assert_eq!(args.vcs_file, Some(PathBuf::from("/tmp/vcs.json")));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/aurup.toml")));
    }

    #[test]
    fn test_aur_url() {
        let args = CliArgs::parse_from(["aurup", "--aur-url", "http://localhost:3000"]);
        assert_eq!(args.aur_url.as_deref(), Some("http://localhost:3000"));
    }

    #[test]
    fn test_quiet_flags() {
        let args = CliArgs::parse_from(["aurup", "-q"]);
        assert!(args.quiet);

        let args = CliArgs::parse_from(["aurup", "--quiet"]);
        assert!(args.quiet);
    }

    #[test]
    fn test_should_prompt() {
        assert!(CliArgs::parse_from(["aurup"]).should_prompt());
        assert!(!CliArgs::parse_from(["aurup", "--noconfirm"]).should_prompt());
        assert!(!CliArgs::parse_from(["aurup", "--json"]).should_prompt());
    }

    #[test]
    fn test_show_progress() {
        assert!(CliArgs::parse_from(["aurup"]).show_progress());
        assert!(!CliArgs::parse_from(["aurup", "-q"]).show_progress());
        assert!(!CliArgs::parse_from(["aurup", "--json"]).show_progress());
    }
}
