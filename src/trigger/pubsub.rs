use std::collections::HashMap;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Body Pub/Sub POSTs to a push subscriber.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEnvelope {
    pub message: PubSubMessage,
    #[serde(default)]
    pub subscription: Option<String>,
}

impl PushEnvelope {
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).context("malformed push envelope")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubSubMessage {
    /// base64 encoded payload, absent for attribute-only messages
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    pub publish_time: Option<DateTime<Utc>>,
}

impl PubSubMessage {
    pub fn payload(&self) -> Result<Vec<u8>> {
        match &self.data {
            Some(data) => STANDARD
                .decode(data.as_bytes())
                .context("message data is not valid base64"),
            None => Ok(Vec::new()),
        }
    }

    /// The whole payload as UTF-8, with nothing trimmed.
    pub fn organization(&self) -> Result<String> {
        String::from_utf8(self.payload()?).context("message data is not valid utf-8")
    }
}
