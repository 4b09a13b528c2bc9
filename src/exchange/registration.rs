use anyhow::{bail, Context, Result};
use http::header::{ACCEPT, AUTHORIZATION};
use http::{HeaderMap, HeaderValue};
use reqwest::Client;
use tracing::{info, warn};

use crate::config::settings::{GithubConfig, StatusPolicy};
use crate::observability::metrics::get_metrics;
use crate::rotation::org::OrganizationName;

/// Mints runner registration tokens with an organization admin token.
pub struct TokenExchanger<'a> {
    http: &'a Client,
    config: &'a GithubConfig,
}

impl<'a> TokenExchanger<'a> {
    pub fn new(http: &'a Client, config: &'a GithubConfig) -> Self {
        Self { http, config }
    }

    pub fn registration_token_url(&self, org: &OrganizationName) -> String {
        format!(
            "{}/orgs/{}/actions/runners/registration-token",
            self.config.api_url.trim_end_matches('/'),
            org
        )
    }

    fn headers(&self, admin_token: &[u8]) -> Result<HeaderMap> {
        let mut authorization = HeaderValue::from_bytes(&[b"token ".as_slice(), admin_token].concat())
            .context("failed to create registration token request: invalid admin token")?;
        authorization.set_sensitive(true);

        let accept = HeaderValue::from_str(&self.config.accept)
            .context("failed to create registration token request: invalid accept header")?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(ACCEPT, accept);
        Ok(headers)
    }

    /// POST to the registration-token endpoint and return the body untouched.
    ///
    /// The body is not parsed. Under [`StatusPolicy::Passthrough`] a non-2xx body
    /// is returned as the token as well.
    pub async fn request_registration_token(
        &self,
        org: &OrganizationName,
        admin_token: &[u8],
    ) -> Result<Vec<u8>> {
        let headers = self.headers(admin_token)?;
        let response = self
            .http
            .post(self.registration_token_url(org))
            .headers(headers)
            .send()
            .await
            .context("failed to request registration token")?;

        let status = response.status();
        let metrics = get_metrics().await;
        let class = if status.is_success() { "success" } else { "non_success" };
        metrics.exchange_responses.with_label_values(&[class]).inc();

        if !status.is_success() {
            match self.config.status_policy {
                StatusPolicy::RejectNonSuccess => {
                    bail!("registration token request failed: {}", status)
                }
                StatusPolicy::Passthrough => {
                    warn!(%org, %status, "registration endpoint answered non-2xx, storing body as token")
                }
            }
        }

        let body = response.bytes().await.context("failed to read body")?;
        info!(%org, %status, bytes = body.len(), "registration token received");
        Ok(body.to_vec())
    }
}
