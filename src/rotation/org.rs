use std::fmt;

use anyhow::{bail, Result};

/// Organization whose tokens are rotated, as received from the trigger payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationName(String);

impl OrganizationName {
    /// The name becomes part of a secret ID and of the GitHub request path, so
    /// it is limited to the secret ID alphabet: ASCII letters, digits, `-`, `_`.
    /// Anything else is rejected rather than rewritten.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            bail!("the name of the organization cannot be empty");
        }
        if let Some(c) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            bail!("the name of the organization contains an invalid character: {:?}", c);
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrganizationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
