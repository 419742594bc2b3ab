//! VCS metadata store for development packages
//!
//! The store is a JSON object keyed by package name:
//!
//! ```json
//! { "yay-git": { "url": "https://github.com/Jguer/yay.git", "branch": "HEAD", "sha": "..." } }
//! ```

use crate::error::SourceError;
use crate::source::VcsStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::debug;

/// Time allowed for a single `git ls-remote`
const LS_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Last seen commit of a development package's upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcsInfo {
    pub url: String,
    pub branch: String,
    pub sha: String,
}

impl VcsInfo {
    pub fn new(url: impl Into<String>, branch: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            branch: branch.into(),
            sha: sha.into(),
        }
    }
}

/// JSON file backed VCS store
#[derive(Debug)]
pub struct VcsFile {
    path: PathBuf,
    lock: Mutex<()>,
}

impl VcsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<BTreeMap<String, VcsInfo>, SourceError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(SourceError::vcs(format!("{}: {}", self.path.display(), e)));
            }
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| SourceError::vcs(format!("{}: {}", self.path.display(), e)))
    }

    async fn save(&self, entries: &BTreeMap<String, VcsInfo>) -> Result<(), SourceError> {
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| SourceError::vcs(e.to_string()))?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| SourceError::vcs(format!("{}: {}", self.path.display(), e)))
    }
}

#[async_trait]
impl VcsStore for VcsFile {
    async fn entries(&self) -> Result<BTreeMap<String, VcsInfo>, SourceError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    async fn needs_update(&self, info: &VcsInfo) -> bool {
        match remote_head(info).await {
            Some(sha) => sha != info.sha,
            None => false,
        }
    }

    async fn remove(&self, names: &[String]) -> Result<(), SourceError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        let before = entries.len();
        for name in names {
            entries.remove(name);
        }
        if entries.len() == before {
            return Ok(());
        }
        debug!(?names, "removing stale vcs entries");
        self.save(&entries).await
    }
}

/// Commit the remote branch points at, None on any failure
async fn remote_head(info: &VcsInfo) -> Option<String> {
    let output = Command::new("git")
        .args(["ls-remote", info.url.as_str(), info.branch.as_str()])
        .env("GIT_TERMINAL_PROMPT", "0")
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(LS_REMOTE_TIMEOUT, output).await {
        Ok(Ok(output)) if output.status.success() => output,
        _ => {
            debug!(url = %info.url, "git ls-remote failed");
            return None;
        }
    };

    parse_ls_remote(&String::from_utf8_lossy(&output.stdout))
}

/// First sha of `git ls-remote` output ("<sha>\t<ref>")
fn parse_ls_remote(text: &str) -> Option<String> {
    text.lines()
        .next()
        .and_then(|line| line.split_whitespace().next())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const STORE: &str = r#"{
        "yay-git": {"url": "https://github.com/Jguer/yay.git", "branch": "HEAD", "sha": "abc"},
        "old-git": {"url": "https://example.com/old.git", "branch": "main", "sha": "def"}
    }"#;

    #[test]
    fn test_parse_ls_remote() {
        let out = "3f2a9c1d\tHEAD\n";
        assert_eq!(parse_ls_remote(out), Some("3f2a9c1d".to_string()));
        assert_eq!(parse_ls_remote(""), None);
    }

    #[tokio::test]
    async fn test_entries_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = VcsFile::new(dir.path().join("vcs.json"));
        assert!(store.entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vcs.json");
        std::fs::write(&path, STORE).unwrap();

        let entries = VcsFile::new(&path).entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["yay-git"].branch, "HEAD");
    }

    #[tokio::test]
    async fn test_entries_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vcs.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = VcsFile::new(&path).entries().await.unwrap_err();
        assert!(matches!(err, SourceError::Vcs { .. }));
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vcs.json");
        std::fs::write(&path, STORE).unwrap();

        let store = VcsFile::new(&path);
        store.remove(&["old-git".to_string()]).await.unwrap();

        let entries = store.entries().await.unwrap();
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["yay-git"]);
    }

    #[tokio::test]
    async fn test_remove_unknown_name_leaves_file_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vcs.json");
        std::fs::write(&path, STORE).unwrap();

        VcsFile::new(&path)
            .remove(&["nope".to_string()])
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), STORE);
    }

    #[tokio::test]
    async fn test_needs_update_unreachable_remote() {
        let dir = TempDir::new().unwrap();
        let store = VcsFile::new(dir.path().join("vcs.json"));
        let info = VcsInfo::new(dir.path().join("no-repo").display().to_string(), "HEAD", "abc");
        assert!(!store.needs_update(&info).await);
    }
}
