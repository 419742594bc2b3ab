//! Upgrades offered by the foreign index, plus development packages

use super::{devel, Candidate, Found, UpgradeOptions};
use crate::domain::{IgnoredUpgrade, InstalledPackage, Upgrade, UpgradeSource};
use crate::error::SourceError;
use crate::source::{ForeignIndex, VcsStore};
use crate::version::is_newer;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Query the foreign index and, when enabled, the VCS store concurrently
///
/// Both producers feed one channel. The result is complete once every
/// sender is gone and both tasks were joined. A failure of either producer
/// goes to `errors`; whatever the other one sent is kept.
pub(crate) async fn fetch(
    index: Arc<dyn ForeignIndex>,
    vcs: Arc<dyn VcsStore>,
    installed: Arc<Vec<InstalledPackage>>,
    options: UpgradeOptions,
    errors: mpsc::UnboundedSender<SourceError>,
) -> Found {
    let foreign: Arc<Vec<InstalledPackage>> =
        Arc::new(installed.iter().filter(|p| p.foreign).cloned().collect());
    let (tx, mut rx) = mpsc::channel::<Candidate>(1);

    let devel_task = options.devel.then(|| {
        let tx = tx.clone();
        let foreign = Arc::clone(&foreign);
        let errors = errors.clone();
        tokio::spawn(async move {
            if let Err(e) = devel::check(vcs, &foreign, &tx).await {
                let _ = errors.send(e);
            }
        })
    });

    let source_name = index.source_name();
    let main_task = {
        let foreign = Arc::clone(&foreign);
        tokio::spawn(async move { compare(index.as_ref(), &foreign, options, &tx).await })
    };

    let mut found = Found::default();
    while let Some(candidate) = rx.recv().await {
        match candidate {
            Candidate::Upgrade(upgrade) => {
                let name = upgrade.name.clone();
                if !found.upgrades.push_unique(upgrade) {
                    debug!(%name, "dropping duplicate foreign upgrade");
                }
            }
            Candidate::Ignored(ignored) => found.ignored.push(ignored),
        }
    }

    if let Some(handle) = devel_task {
        if let Err(e) = handle.await {
            debug!(error = %e, "devel task ended abnormally");
        }
    }
    let compared = main_task
        .await
        .map_err(|e| SourceError::network(source_name, format!("task failed: {}", e)))
        .and_then(|result| result);
    if let Err(e) = compared {
        let _ = errors.send(e);
    }

    found
}

/// Compare installed foreign packages with the index
async fn compare(
    index: &dyn ForeignIndex,
    foreign: &[InstalledPackage],
    options: UpgradeOptions,
    tx: &mpsc::Sender<Candidate>,
) -> Result<(), SourceError> {
    if foreign.is_empty() {
        return Ok(());
    }

    let names: Vec<String> = foreign.iter().map(|p| p.name.clone()).collect();
    let remote = index.info(&names).await?;
    debug!(
        queried = names.len(),
        found = remote.len(),
        source = index.source_name(),
        "foreign index answered"
    );

    for package in foreign {
        let Some(candidate) = remote.get(&package.name) else {
            continue;
        };

        let newer = is_newer(&package.version, &candidate.version);
        let rebuilt = options.time_update
            && package
                .build_date
                .is_some_and(|built| candidate.last_modified > built);
        if !newer && !rebuilt {
            continue;
        }

        let item = if package.should_ignore() {
            Candidate::Ignored(IgnoredUpgrade::new(
                &package.name,
                &package.version,
                &candidate.version,
            ))
        } else {
            debug!(name = %package.name, version = %candidate.version, "foreign upgrade");
            Candidate::Upgrade(Upgrade::new(
                &package.name,
                UpgradeSource::Aur,
                &package.version,
                &candidate.version,
            ))
        };

        if tx.send(item).await.is_err() {
            break;
        }
    }

    Ok(())
}
