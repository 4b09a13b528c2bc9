//! Secrets module
//!
//! Google Secret Manager over its v1 REST surface: resource addresses, wire
//! types, credentials and the paginated version walk.

pub mod address;
pub mod auth;
pub mod client;
pub mod pages;
pub mod types;

pub use address::SecretAddress;
pub use client::SecretManagerClient;
pub use types::{SecretVersion, VersionState};
