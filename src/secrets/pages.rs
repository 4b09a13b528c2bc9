use std::collections::VecDeque;

use anyhow::{bail, Result};

use crate::secrets::client::SecretManagerClient;
use crate::secrets::types::SecretVersion;

/// Lazy walk over every version of a secret.
///
/// Pages are requested only when the buffered one runs dry. Once the last page
/// is drained the walk stays exhausted; start a new one to list again.
pub struct VersionPages<'a> {
    client: &'a SecretManagerClient,
    parent: String,
    buffered: VecDeque<SecretVersion>,
    next_page_token: Option<String>,
    exhausted: bool,
    pages_fetched: usize,
}

impl<'a> VersionPages<'a> {
    pub fn new(client: &'a SecretManagerClient, parent: String) -> Self {
        Self {
            client,
            parent,
            buffered: VecDeque::new(),
            next_page_token: None,
            exhausted: false,
            pages_fetched: 0,
        }
    }

    pub async fn next(&mut self) -> Result<Option<SecretVersion>> {
        loop {
            if let Some(version) = self.buffered.pop_front() {
                return Ok(Some(version));
            }
            if self.exhausted {
                return Ok(None);
            }

            let page = self
                .client
                .list_versions_page(&self.parent, self.next_page_token.as_deref())
                .await?;
            self.pages_fetched += 1;

            let prefix = format!("{}/versions/", self.parent);
            if let Some(foreign) = page.versions.iter().find(|v| !v.name.starts_with(&prefix)) {
                bail!("listing of {} returned a version of another secret: {}", self.parent, foreign.name);
            }
            self.buffered.extend(page.versions);
            self.next_page_token = page.next_page_token.filter(|token| !token.is_empty());
            self.exhausted = self.next_page_token.is_none();
        }
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}
