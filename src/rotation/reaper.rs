use anyhow::{Context, Result};
use tracing::info;

use crate::observability::metrics::get_metrics;
use crate::secrets::{SecretAddress, SecretManagerClient};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReapSummary {
    pub seen: usize,
    pub destroyed: usize,
    pub already_destroyed: usize,
}

/// Destroy every version of `secret` that is not destroyed yet, in listing order.
///
/// Stops at the first listing or destroy error. Versions destroyed before the
/// error stay destroyed.
pub async fn destroy_older_versions(
    store: &SecretManagerClient,
    secret: &SecretAddress,
) -> Result<ReapSummary> {
    let metrics = get_metrics().await;
    let mut summary = ReapSummary::default();
    let mut versions = store.list_versions(&secret.name());

    while let Some(version) = versions
        .next()
        .await
        .context("failed to list secret versions")?
    {
        summary.seen += 1;
        info!(version = %version.name, state = %version.state, "found secret version");

        if version.state.is_destroyed() {
            summary.already_destroyed += 1;
            continue;
        }

        info!(version = %version.name, "destroying secret version");
        store
            .destroy_version(&version.name)
            .await
            .context("failed to destroy secret version")?;
        summary.destroyed += 1;
        metrics.versions_destroyed.inc();
    }

    info!(
        secret = %secret,
        pages = versions.pages_fetched(),
        seen = summary.seen,
        destroyed = summary.destroyed,
        "older versions destroyed"
    );
    Ok(summary)
}
