use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::settings::CredentialsConfig;

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
    expires_in: Option<u64>,
}

/// Bearer token for Secret Manager, resolved once per invocation and never cached.
pub async fn resolve_access_token(client: &Client, credentials: &CredentialsConfig) -> Result<String> {
    match credentials {
        CredentialsConfig::Static(token) => Ok(token.to_owned()),
        CredentialsConfig::Metadata { url } => fetch_metadata_token(client, url).await,
    }
}

async fn fetch_metadata_token(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .header("Metadata-Flavor", "Google")
        .send()
        .await
        .context("metadata server unreachable")?;

    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("metadata token request failed: {}", status));
    }

    let token: MetadataToken = response
        .json()
        .await
        .context("metadata token response is not valid json")?;
    debug!(expires_in = ?token.expires_in, "access token received from metadata server");
    Ok(token.access_token)
}
