use anyhow::{Context, Result};
use tracing::info;

use crate::secrets::{SecretAddress, SecretManagerClient, SecretVersion};

/// Latest version of the admin-token secret.
pub async fn read_admin_token(store: &SecretManagerClient, secret: &SecretAddress) -> Result<Vec<u8>> {
    let token = store
        .access_version(&secret.latest())
        .await
        .context("failed to access secret version")?;
    info!(secret = %secret, "admin token found");
    Ok(token)
}

/// Store the token as a new version; it becomes the latest one.
pub async fn save_registration_token(
    store: &SecretManagerClient,
    secret: &SecretAddress,
    token: &[u8],
) -> Result<SecretVersion> {
    let version = store
        .add_version(&secret.name(), token)
        .await
        .context("failed to add secret version")?;
    info!(version = %version.name, "added secret version");
    Ok(version)
}
