//! Development package checks against the VCS store

use super::Candidate;
use crate::domain::{IgnoredUpgrade, InstalledPackage, Upgrade, LATEST_COMMIT};
use crate::error::SourceError;
use crate::source::VcsStore;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Send a candidate for every tracked package whose upstream moved
///
/// Entries for packages that are no longer installed are dropped from the
/// store. A failed removal is only logged.
pub(crate) async fn check(
    vcs: Arc<dyn VcsStore>,
    foreign: &[InstalledPackage],
    tx: &mpsc::Sender<Candidate>,
) -> Result<(), SourceError> {
    let entries = vcs.entries().await?;
    let mut stale = Vec::new();

    for (name, info) in &entries {
        if !vcs.needs_update(info).await {
            continue;
        }

        let Some(package) = foreign.iter().find(|p| &p.name == name) else {
            stale.push(name.clone());
            continue;
        };

        let candidate = if package.should_ignore() {
            Candidate::Ignored(IgnoredUpgrade::new(name, &package.version, LATEST_COMMIT))
        } else {
            debug!(%name, "devel upgrade");
            Candidate::Upgrade(Upgrade::devel(name, &package.version))
        };

        if tx.send(candidate).await.is_err() {
            break;
        }
    }

    if !stale.is_empty() {
        debug!(?stale, "dropping vcs entries for removed packages");
        if let Err(e) = vcs.remove(&stale).await {
            warn!(error = %e, "failed to clean up vcs store");
        }
    }

    Ok(())
}
