// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;

use base64::{engine::general_purpose::STANDARD, Engine};
use httpmock::MockServer;
use reqwest::Client;
use serde_json::Value;

use crate::config::settings::{CredentialsConfig, RotatorConfig};

pub const PROJECT: &str = "P";
pub const ACCESS_TOKEN: &str = "ya29.test-access-token";

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Config pointing both external services at mock servers, static bearer token.
pub fn mock_config(secret_manager: &MockServer, github: &MockServer) -> RotatorConfig {
    let mut config = RotatorConfig::new(PROJECT);
    config.github.api_url = github.base_url();
    config.secret_manager.url = secret_manager.base_url();
    config.secret_manager.credentials = CredentialsConfig::Static(ACCESS_TOKEN.to_owned());
    config
}

pub fn b64(data: &str) -> String {
    STANDARD.encode(data)
}

pub fn bearer() -> String {
    format!("Bearer {}", ACCESS_TOKEN)
}

pub fn secret_path(org: &str, suffix: &str) -> String {
    format!("projects/{}/secrets/{}-{}", PROJECT, org, suffix)
}

pub fn version_name(org: &str, id: u32) -> String {
    format!("{}/versions/{}", secret_path(org, "registration-token"), id)
}

pub fn version_json(org: &str, id: u32, state: &str) -> Value {
    json!({
        "name": version_name(org, id),
        "createTime": "2024-05-01T10:00:00.000000Z",
        "state": state,
    })
}

/// Mock `GET {name}:access` returning `payload`.
pub async fn mock_access<'a>(server: &'a MockServer, org: &str, payload: &str) -> httpmock::Mock<'a> {
    let path = format!("/v1/{}/versions/latest:access", secret_path(org, "admin-token"));
    server
        .mock_async(|when, then| {
            when.method(httpmock::Method::GET)
                .path(path)
                .header("authorization", bearer());
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "name": format!("{}/versions/7", secret_path(org, "admin-token")),
                    "payload": {"data": b64(payload)}
                }));
        })
        .await
}

/// Mock a single-page `GET {parent}/versions`.
pub async fn mock_list<'a>(server: &'a MockServer, org: &str, versions: Vec<Value>) -> httpmock::Mock<'a> {
    let path = format!("/v1/{}/versions", secret_path(org, "registration-token"));
    server
        .mock_async(|when, then| {
            when.method(httpmock::Method::GET)
                .path(path)
                .header("authorization", bearer());
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"versions": versions, "totalSize": versions.len()}));
        })
        .await
}

/// Mock `POST {version}:destroy` for one version id.
pub async fn mock_destroy<'a>(server: &'a MockServer, org: &str, id: u32) -> httpmock::Mock<'a> {
    let name = version_name(org, id);
    let path = format!("/v1/{}:destroy", name);
    server
        .mock_async(|when, then| {
            when.method(httpmock::Method::POST)
                .path(path)
                .header("authorization", bearer());
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"name": name, "state": "DESTROYED"}));
        })
        .await
}

/// Mock `POST {parent}:addVersion` expecting exactly `payload`.
pub async fn mock_add_version<'a>(
    server: &'a MockServer,
    org: &str,
    payload: &str,
    new_id: u32,
) -> httpmock::Mock<'a> {
    let path = format!("/v1/{}:addVersion", secret_path(org, "registration-token"));
    server
        .mock_async(|when, then| {
            when.method(httpmock::Method::POST)
                .path(path)
                .header("authorization", bearer())
                .json_body(json!({"payload": {"data": b64(payload)}}));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(version_json(org, new_id, "ENABLED"));
        })
        .await
}

/// Mock the registration endpoint answering `status` with a raw `body`.
pub async fn mock_registration<'a>(
    server: &'a MockServer,
    org: &str,
    admin_token: &str,
    status: u16,
    body: &str,
) -> httpmock::Mock<'a> {
    let path = format!("/orgs/{}/actions/runners/registration-token", org);
    server
        .mock_async(|when, then| {
            when.method(httpmock::Method::POST)
                .path(path)
                .header("authorization", format!("token {}", admin_token))
                .header("accept", "application/vnd.github.v3+json");
            then.status(status).body(body);
        })
        .await
}
