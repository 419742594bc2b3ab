//! Configuration loading
//!
//! This module provides:
//! - The optional TOML configuration file
//! - A reader for the `[options]` section of pacman.conf
//! - [`Settings`]: CLI flags layered over the config file and pacman.conf

use crate::cli::CliArgs;
use crate::error::ConfigError;
use crate::source::{IgnoreRules, AUR_URL, DEFAULT_DB_PATH};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default pacman configuration file
pub const DEFAULT_PACMAN_CONF: &str = "/etc/pacman.conf";

/// Contents of `config.toml`
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    pub devel: bool,
    pub timeupdate: bool,
    pub ignore: Vec<String>,
    pub dbpath: Option<PathBuf>,
    pub pacman_conf: Option<PathBuf>,
    pub vcs_file: Option<PathBuf>,
    pub aur_url: Option<String>,
}

impl FileConfig {
    /// Parse a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
        toml::from_str(&content).map_err(|e| ConfigError::parse(path, e.to_string()))
    }

    /// Parse the file at `path`, or return defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// The settings this tool reads from pacman.conf
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PacmanConf {
    pub db_path: Option<PathBuf>,
    pub ignore_pkg: Vec<String>,
    pub ignore_group: Vec<String>,
}

impl PacmanConf {
    /// Read pacman.conf through `pacman-conf`, treating a missing file as empty
    ///
    /// `pacman-conf` expands `Include` directives and merges repeated keys.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        pacmanconf::Config::from_file(path)
            .map(Self::from)
            .map_err(|e| ConfigError::parse(path, e.to_string()))
    }
}

impl From<pacmanconf::Config> for PacmanConf {
    fn from(conf: pacmanconf::Config) -> Self {
        Self {
            db_path: (!conf.db_path.is_empty()).then(|| PathBuf::from(conf.db_path)),
            ignore_pkg: conf.ignore_pkg,
            ignore_group: conf.ignore_group,
        }
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub devel: bool,
    pub time_update: bool,
    pub db_path: PathBuf,
    pub vcs_file: PathBuf,
    pub aur_url: String,
    pub ignore: IgnoreRules,
}

impl Settings {
    /// Layer CLI flags over the config file over pacman.conf
    ///
    /// Ignore lists from all three are merged.
    pub fn resolve(args: &CliArgs, file: FileConfig, pacman: PacmanConf) -> Self {
        let db_path = args
            .dbpath
            .clone()
            .or(file.dbpath)
            .or(pacman.db_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let vcs_file = args
            .vcs_file
            .clone()
            .or(file.vcs_file)
            .unwrap_or_else(default_vcs_file);

        let aur_url = args
            .aur_url
            .clone()
            .or(file.aur_url)
            .unwrap_or_else(|| AUR_URL.to_string());

        let ignore = IgnoreRules::new(pacman.ignore_pkg, pacman.ignore_group)
            .with_packages(file.ignore)
            .with_packages(args.ignore.iter().cloned());

        Self {
            devel: args.devel || file.devel,
            time_update: args.time_update || file.timeupdate,
            db_path,
            vcs_file,
            aur_url,
            ignore,
        }
    }

    /// Load every configuration source named by `args`
    pub fn load(args: &CliArgs) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::load_or_default(&config_path())?,
        };

        let pacman_conf = args
            .pacman_conf
            .clone()
            .or_else(|| file.pacman_conf.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PACMAN_CONF));
        let pacman = PacmanConf::load(&pacman_conf)?;

        Ok(Self::resolve(args, file, pacman))
    }
}

/// Returns the default path of the configuration file.
/// Uses $XDG_CONFIG_HOME/aurup/config.toml if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/aurup/config.toml.
pub fn config_path() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir()).join("config.toml")
}

/// Returns the default VCS metadata file under the cache directory.
pub fn default_vcs_file() -> PathBuf {
    cache_dir_with_env(std::env::var("XDG_CACHE_HOME").ok(), dirs::home_dir()).join("vcs.json")
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    dir.join("aurup")
}

fn cache_dir_with_env(xdg_cache_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let dir = xdg_cache_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".cache")))
        .unwrap_or_else(|| PathBuf::from("."));

    dir.join("aurup")
}
