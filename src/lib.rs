//! # Token Rotator Library
//!
//! Rotates GitHub Actions runner registration tokens kept in Google Secret Manager.
//! One invocation reads an organization's admin token, exchanges it for a fresh
//! registration token, destroys the previous registration-token versions and
//! stores the new token as the latest version.
//!
//! Modules:
//! - `config` — rotator configuration passed in by the caller
//! - `secrets` — Secret Manager REST client, addresses and version enumeration
//! - `exchange` — registration token exchange against the GitHub API
//! - `rotation` — the rotation handler and its steps
//! - `trigger` — Pub/Sub push envelopes and raw payload handling
//! - `server` — push endpoint, health and metrics routes

pub mod config;
pub mod secrets;
pub mod exchange;
pub mod rotation;
pub mod trigger;
pub mod observability;
pub mod server;
pub mod utils;
pub mod tests;


pub use crate::config::settings::RotatorConfig;
pub use crate::rotation::handler::{RotationHandler, RotationReport};
