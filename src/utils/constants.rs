//! Shared constants and invariants

pub const ADMIN_TOKEN_SECRET_SUFFIX: &str = "admin-token";
pub const REGISTRATION_TOKEN_SECRET_SUFFIX: &str = "registration-token";

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
pub const DEFAULT_SECRET_MANAGER_URL: &str = "https://secretmanager.googleapis.com";
pub const DEFAULT_METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

// Rotation steps, used as metric labels and log fields
pub const STEP_READ_ADMIN_TOKEN: &str = "read_admin_token";
pub const STEP_EXCHANGE: &str = "exchange_registration_token";
pub const STEP_REAP_VERSIONS: &str = "destroy_older_versions";
pub const STEP_SAVE_TOKEN: &str = "save_registration_token";
