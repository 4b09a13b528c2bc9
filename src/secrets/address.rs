use std::fmt;

use crate::rotation::org::OrganizationName;
use crate::utils::constants::{ADMIN_TOKEN_SECRET_SUFFIX, REGISTRATION_TOKEN_SECRET_SUFFIX};

/// Resource name of a secret: `projects/{project}/secrets/{org}-{suffix}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretAddress {
    project_id: String,
    secret_id: String,
}

impl SecretAddress {
    pub fn new(project_id: &str, org: &OrganizationName, suffix: &str) -> Self {
        Self {
            project_id: project_id.to_owned(),
            secret_id: format!("{}-{}", org, suffix),
        }
    }

    pub fn admin_token(project_id: &str, org: &OrganizationName) -> Self {
        Self::new(project_id, org, ADMIN_TOKEN_SECRET_SUFFIX)
    }

    pub fn registration_token(project_id: &str, org: &OrganizationName) -> Self {
        Self::new(project_id, org, REGISTRATION_TOKEN_SECRET_SUFFIX)
    }

    /// Parent used for listing and adding versions.
    pub fn name(&self) -> String {
        format!("projects/{}/secrets/{}", self.project_id, self.secret_id)
    }

    pub fn latest(&self) -> String {
        self.version("latest")
    }

    pub fn version(&self, version: &str) -> String {
        format!("{}/versions/{}", self.name(), version)
    }
}

impl fmt::Display for SecretAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org(name: &str) -> OrganizationName {
        OrganizationName::parse(name).unwrap()
    }

    #[test]
    fn admin_token_latest_matches_template() {
        for name in ["acme", "my-org", "Org_1"] {
            let addr = SecretAddress::admin_token("P", &org(name));
            assert_eq!(
                addr.latest(),
                format!("projects/P/secrets/{}-admin-token/versions/latest", name)
            );
        }
    }

    #[test]
    fn registration_token_parent_and_version() {
        let addr = SecretAddress::registration_token("my-project", &org("acme"));
        assert_eq!(addr.name(), "projects/my-project/secrets/acme-registration-token");
        assert_eq!(
            addr.version("3"),
            "projects/my-project/secrets/acme-registration-token/versions/3"
        );
        assert_eq!(addr.to_string(), addr.name());
    }

    #[test]
    fn empty_project_yields_malformed_but_stable_address() {
        let addr = SecretAddress::admin_token("", &org("acme"));
        assert_eq!(addr.latest(), "projects//secrets/acme-admin-token/versions/latest");
    }
}
