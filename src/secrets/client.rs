use anyhow::{anyhow, Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::config::settings::SecretManagerConfig;
use crate::secrets::auth::resolve_access_token;
use crate::secrets::pages::VersionPages;
use crate::secrets::types::{
    AccessVersionResponse, AddVersionRequest, GoogleErrorResponse, ListVersionsResponse,
    SecretPayload, SecretVersion,
};

/// Secret Manager v1 REST client bound to one access token.
#[derive(Clone)]
pub struct SecretManagerClient {
    http: Client,
    base_url: String,
    access_token: String,
    page_size: Option<u32>,
}

impl SecretManagerClient {
    pub fn new(http: Client, base_url: &str, access_token: String, page_size: Option<u32>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            access_token,
            page_size,
        }
    }

    /// Resolve credentials and build a client for one invocation.
    pub async fn connect(http: Client, config: &SecretManagerConfig) -> Result<Self> {
        let access_token = resolve_access_token(&http, &config.credentials).await?;
        Ok(Self::new(http, &config.url, access_token, config.page_size))
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/v1/{}", self.base_url, resource)
    }

    /// `GET {name}:access`, returns the decoded payload bytes.
    pub async fn access_version(&self, name: &str) -> Result<Vec<u8>> {
        let request = self.http.get(self.endpoint(&format!("{}:access", name)));
        let response: AccessVersionResponse = self.send_json(request, "access secret version").await?;
        debug!(version = %response.name, "secret version accessed");
        response.payload.decode()
    }

    /// One page of `GET {parent}/versions`.
    pub async fn list_versions_page(
        &self,
        parent: &str,
        page_token: Option<&str>,
    ) -> Result<ListVersionsResponse> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(page_size) = self.page_size {
            query.push(("pageSize", page_size.to_string()));
        }
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_owned()));
        }

        let request = self
            .http
            .get(self.endpoint(&format!("{}/versions", parent)))
            .query(&query);
        self.send_json(request, "list secret versions").await
    }

    pub fn list_versions(&self, parent: &str) -> VersionPages<'_> {
        VersionPages::new(self, parent.to_owned())
    }

    /// `POST {name}:destroy`
    pub async fn destroy_version(&self, name: &str) -> Result<SecretVersion> {
        let request = self
            .http
            .post(self.endpoint(&format!("{}:destroy", name)))
            .json(&json!({}));
        self.send_json(request, "destroy secret version").await
    }

    /// `POST {parent}:addVersion`
    pub async fn add_version(&self, parent: &str, data: &[u8]) -> Result<SecretVersion> {
        let body = AddVersionRequest {
            payload: SecretPayload::from_bytes(data),
        };
        let request = self
            .http
            .post(self.endpoint(&format!("{}:addVersion", parent)))
            .json(&body);
        self.send_json(request, "add secret version").await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, action: &str) -> Result<T> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .with_context(|| format!("{} request failed", action))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<GoogleErrorResponse>(&body) {
                Ok(err) => anyhow!(
                    "{} request failed: {} {}: {}",
                    action,
                    err.error.code,
                    err.error.status.unwrap_or_default(),
                    err.error.message
                ),
                Err(_) => anyhow!("{} request failed: {}", action, status),
            });
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("{} response is unreadable", action))
    }
}
