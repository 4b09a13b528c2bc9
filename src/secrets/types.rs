use std::fmt;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ================================
/// Secret versions
/// ================================
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretVersion {
    /// `projects/{project}/secrets/{secret}/versions/{id}`
    pub name: String,
    #[serde(default)]
    pub state: VersionState,
    pub create_time: Option<DateTime<Utc>>,
    pub destroy_time: Option<DateTime<Utc>>,
}

impl SecretVersion {
    /// Trailing version id of the resource name.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Lifecycle state owned by the secret store. `Destroyed` is terminal.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionState {
    #[default]
    StateUnspecified,
    Enabled,
    Disabled,
    Destroyed,
    #[serde(other)]
    Unknown,
}

impl VersionState {
    pub fn is_destroyed(&self) -> bool {
        matches!(self, VersionState::Destroyed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VersionState::StateUnspecified => "STATE_UNSPECIFIED",
            VersionState::Enabled => "ENABLED",
            VersionState::Disabled => "DISABLED",
            VersionState::Destroyed => "DESTROYED",
            VersionState::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for VersionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVersionsResponse {
    #[serde(default)]
    pub versions: Vec<SecretVersion>,
    pub next_page_token: Option<String>,
}

/// ================================
/// Payloads
/// ================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretPayload {
    /// base64 of the raw bytes
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_crc32c: Option<String>,
}

impl SecretPayload {
    pub fn from_bytes(data: &[u8]) -> Self {
        Self {
            data: STANDARD.encode(data),
            data_crc32c: None,
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.data.as_bytes())
            .context("secret payload is not valid base64")
    }
}

#[derive(Debug, Deserialize)]
pub struct AccessVersionResponse {
    pub name: String,
    pub payload: SecretPayload,
}

#[derive(Debug, Serialize)]
pub struct AddVersionRequest {
    pub payload: SecretPayload,
}

/// ================================
/// Google API errors
/// ================================
#[derive(Debug, Deserialize)]
pub struct GoogleErrorResponse {
    pub error: GoogleError,
}

#[derive(Debug, Deserialize)]
pub struct GoogleError {
    pub code: u16,
    pub message: String,
    pub status: Option<String>,
}
