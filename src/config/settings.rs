use std::fmt;
use std::time::Duration;

use anyhow::Result;
use clap::ValueEnum;
use reqwest::Client;

use crate::utils::constants::{
    DEFAULT_GITHUB_ACCEPT, DEFAULT_GITHUB_API_URL, DEFAULT_METADATA_TOKEN_URL,
    DEFAULT_SECRET_MANAGER_URL,
};

/// ================================
/// Rotator configuration
/// ================================
///
/// Built once by the binary from flags and environment, then handed to
/// [`crate::rotation::handler::RotationHandler`]. The library never reads the
/// environment on its own.
#[derive(Debug, Clone)]
pub struct RotatorConfig {
    /// Project hosting both secrets, substituted into every secret address.
    pub project_id: String,
    pub github: GithubConfig,
    pub secret_manager: SecretManagerConfig,
    /// No timeout unless set; a hung call blocks until the runtime's own deadline.
    pub http_timeout_secs: Option<u64>,
}

impl RotatorConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            github: GithubConfig::default(),
            secret_manager: SecretManagerConfig::default(),
            http_timeout_secs: None,
        }
    }

    pub fn http_client(&self) -> Result<Client> {
        let mut builder = Client::builder();
        if let Some(secs) = self.http_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(builder.build()?)
    }
}

#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub api_url: String,
    /// media type sent in `Accept`
    pub accept: String,
    pub status_policy: StatusPolicy,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_GITHUB_API_URL.to_owned(),
            accept: DEFAULT_GITHUB_ACCEPT.to_owned(),
            status_policy: StatusPolicy::Passthrough,
        }
    }
}

/// What to do with a non-2xx answer from the registration endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Keep the body as the token whatever the status is.
    #[default]
    Passthrough,
    /// Treat any non-2xx answer as a failed exchange.
    RejectNonSuccess,
}

impl StatusPolicy {
    pub fn from_flag(reject_non_success: bool) -> Self {
        if reject_non_success {
            StatusPolicy::RejectNonSuccess
        } else {
            StatusPolicy::Passthrough
        }
    }
}

#[derive(Debug, Clone)]
pub struct SecretManagerConfig {
    pub url: String,
    pub credentials: CredentialsConfig,
    /// `pageSize` sent on version listing, service default when absent
    pub page_size: Option<u32>,
}

impl Default for SecretManagerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SECRET_MANAGER_URL.to_owned(),
            credentials: CredentialsConfig::Metadata {
                url: DEFAULT_METADATA_TOKEN_URL.to_owned(),
            },
            page_size: None,
        }
    }
}

/// Where the bearer token for Secret Manager comes from.
#[derive(Clone)]
pub enum CredentialsConfig {
    Static(String),
    Metadata { url: String },
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialsConfig::Static(_) => f.write_str("Static(<redacted>)"),
            CredentialsConfig::Metadata { url } => {
                f.debug_struct("Metadata").field("url", url).finish()
            }
        }
    }
}

/// ================================
/// Push server
/// ================================
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new (level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_credentials_are_redacted_in_debug_output() {
        let creds = CredentialsConfig::Static("ya29.secret".to_owned());
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("ya29.secret"));
        assert!(printed.contains("redacted"));
    }

    #[test]
    fn defaults_point_at_public_endpoints() {
        let cfg = RotatorConfig::new("P");
        assert_eq!(cfg.github.api_url, "https://api.github.com");
        assert_eq!(cfg.github.accept, "application/vnd.github.v3+json");
        assert_eq!(cfg.github.status_policy, StatusPolicy::Passthrough);
        assert_eq!(cfg.secret_manager.url, "https://secretmanager.googleapis.com");
        assert!(cfg.http_timeout_secs.is_none());
    }

    #[test]
    fn reject_flag_maps_to_policy() {
        assert_eq!(StatusPolicy::from_flag(true), StatusPolicy::RejectNonSuccess);
        assert_eq!(StatusPolicy::from_flag(false), StatusPolicy::Passthrough);
    }
}
