//! pacman backed local database
//!
//! Installed packages come from `<dbpath>/local/*/desc`, the sync index from
//! `pacman -Sl` and the foreign flag from `pacman -Qmq`.

use crate::domain::{InstalledPackage, SyncPackage};
use crate::error::SourceError;
use crate::source::{IgnoreRules, LocalDb, SyncIndex};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Default pacman database directory
pub const DEFAULT_DB_PATH: &str = "/var/lib/pacman";

/// Local database read through the filesystem and the pacman binary
#[derive(Debug, Clone)]
pub struct PacmanDb {
    db_path: PathBuf,
    ignore: IgnoreRules,
}

/// Fields of a local `desc` file this tool needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct LocalDesc {
    name: String,
    version: String,
    build_date: Option<DateTime<Utc>>,
    groups: Vec<String>,
}

impl PacmanDb {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ignore: IgnoreRules::default(),
        }
    }

    /// Set the ignore rules
    pub fn with_ignore(mut self, ignore: IgnoreRules) -> Self {
        self.ignore = ignore;
        self
    }

    fn run_pacman(&self, args: &[&str]) -> Result<Output, SourceError> {
        let command = format!("pacman {}", args.join(" "));
        debug!(%command, "running");
        Command::new("pacman")
            .arg("--dbpath")
            .arg(&self.db_path)
            .args(args)
            .output()
            .map_err(|e| SourceError::command_failed(command, e.to_string()))
    }

    /// Names of installed packages missing from every sync database
    fn foreign_names(&self) -> Result<HashSet<String>, SourceError> {
        let out = self.run_pacman(&["-Qmq"])?;
        // pacman exits 1 with no output when nothing matches.
        if !out.status.success() && !(out.stdout.is_empty() && out.stderr.is_empty()) {
            return Err(SourceError::command_failed(
                "pacman -Qmq",
                String::from_utf8_lossy(&out.stderr).trim().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&out.stdout)
            .lines()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }
}

impl LocalDb for PacmanDb {
    fn installed(&self) -> Result<Vec<InstalledPackage>, SourceError> {
        let descs = read_local_dir(&self.db_path.join("local"))?;
        let foreign = self.foreign_names()?;

        let mut packages: Vec<InstalledPackage> = descs
            .into_iter()
            .map(|desc| {
                let mut package = InstalledPackage::new(&desc.name, &desc.version);
                package.build_date = desc.build_date;
                package.foreign = foreign.contains(&desc.name);
                package.ignored = self.ignore.is_ignored(&desc.name, &desc.groups);
                package
            })
            .collect();
        packages.sort_by(|a, b| a.name.cmp(&b.name));

        debug!(
            count = packages.len(),
            foreign = foreign.len(),
            "read local database"
        );
        Ok(packages)
    }

    fn sync_index(&self) -> Result<SyncIndex, SourceError> {
        let out = self.run_pacman(&["-Sl"])?;
        if !out.status.success() {
            return Err(SourceError::command_failed(
                "pacman -Sl",
                String::from_utf8_lossy(&out.stderr).trim().to_string(),
            ));
        }
        let index = SyncIndex::new(parse_sync_list(&String::from_utf8_lossy(&out.stdout)));
        debug!(count = index.len(), "read sync databases");
        Ok(index)
    }
}

fn read_local_dir(local: &Path) -> Result<Vec<LocalDesc>, SourceError> {
    let entries = fs::read_dir(local)
        .map_err(|e| SourceError::local_db(format!("{}: {}", local.display(), e)))?;

    let mut descs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path().join("desc");
        if !path.is_file() {
            continue;
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| SourceError::local_db(format!("{}: {}", path.display(), e)))?;
        match parse_desc(&content) {
            Some(desc) => descs.push(desc),
            None => debug!(path = %path.display(), "skipping malformed desc"),
        }
    }
    Ok(descs)
}

/// Parse a local `desc` file, None when NAME or VERSION is missing
fn parse_desc(content: &str) -> Option<LocalDesc> {
    let mut desc = LocalDesc::default();
    let mut field: Option<&str> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            field = None;
            continue;
        }
        if line.starts_with('%') && line.ends_with('%') && line.len() > 1 {
            field = Some(line);
            continue;
        }
        match field {
            Some("%NAME%") => desc.name = line.to_string(),
            Some("%VERSION%") => desc.version = line.to_string(),
            Some("%BUILDDATE%") => {
                desc.build_date = line
                    .parse::<i64>()
                    .ok()
                    .and_then(|secs| DateTime::from_timestamp(secs, 0));
            }
            Some("%GROUPS%") => desc.groups.push(line.to_string()),
            _ => {}
        }
    }

    (!desc.name.is_empty() && !desc.version.is_empty()).then_some(desc)
}

/// Parse `pacman -Sl` output ("repo name version [installed]")
fn parse_sync_list(text: &str) -> Vec<SyncPackage> {
    text.lines()
        .filter_map(|line| {
            let mut it = line.split_whitespace();
            let db = it.next()?;
            let name = it.next()?;
            let version = it.next()?;
            Some(SyncPackage::new(db, name, version))
        })
        .collect()
}
