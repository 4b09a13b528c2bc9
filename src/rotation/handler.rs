use std::future::Future;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::time::Instant;
use tracing::{error, info};

use crate::config::settings::RotatorConfig;
use crate::exchange::TokenExchanger;
use crate::observability::metrics::get_metrics;
use crate::rotation::org::OrganizationName;
use crate::rotation::reaper::destroy_older_versions;
use crate::rotation::secret_io::{read_admin_token, save_registration_token};
use crate::secrets::{SecretAddress, SecretManagerClient};
use crate::utils::constants::{
    STEP_EXCHANGE, STEP_READ_ADMIN_TOKEN, STEP_REAP_VERSIONS, STEP_SAVE_TOKEN,
};

/// Outcome of a completed rotation.
#[derive(Debug, Clone)]
pub struct RotationReport {
    pub org: String,
    pub destroyed_versions: usize,
    pub new_version: String,
}

/// Runs one rotation per call: read admin token, exchange it, destroy the old
/// registration-token versions, store the new one.
///
/// Steps run strictly in that order and the first error ends the call. Nothing
/// is rolled back: a token minted before a failed destroy or write is dropped.
/// Concurrent calls for the same organization are not coordinated.
#[derive(Debug, Clone)]
pub struct RotationHandler {
    config: RotatorConfig,
    http: Client,
}

impl RotationHandler {
    pub fn new(config: RotatorConfig) -> Result<Self> {
        let http = config.http_client().context("failed to build http client")?;
        Ok(Self::with_client(config, http))
    }

    pub fn with_client(config: RotatorConfig, http: Client) -> Self {
        Self { config, http }
    }

    /// Rotate for the organization named by a raw trigger payload.
    pub async fn rotate(&self, raw_org: &str) -> Result<RotationReport> {
        let org = match OrganizationName::parse(raw_org) {
            Ok(org) => org,
            Err(err) => {
                get_metrics().await.rotations.with_label_values(&["rejected"]).inc();
                return Err(err);
            }
        };
        self.rotate_org(&org).await
    }

    pub async fn rotate_org(&self, org: &OrganizationName) -> Result<RotationReport> {
        let metrics = get_metrics().await;
        info!(%org, "rotation started");

        match self.run_steps(org).await {
            Ok(report) => {
                metrics.rotations.with_label_values(&["success"]).inc();
                info!(
                    %org,
                    destroyed = report.destroyed_versions,
                    version = %report.new_version,
                    "rotation finished"
                );
                Ok(report)
            }
            Err(err) => {
                metrics.rotations.with_label_values(&["failure"]).inc();
                error!(%org, "rotation failed: {:#}", err);
                Err(err)
            }
        }
    }

    async fn run_steps(&self, org: &OrganizationName) -> Result<RotationReport> {
        let project_id = self.config.project_id.as_str();
        let admin_secret = SecretAddress::admin_token(project_id, org);
        let registration_secret = SecretAddress::registration_token(project_id, org);

        let store = SecretManagerClient::connect(self.http.clone(), &self.config.secret_manager)
            .await
            .context("failed to setup secret store client")?;

        let admin_token = timed(STEP_READ_ADMIN_TOKEN, read_admin_token(&store, &admin_secret)).await?;

        let exchanger = TokenExchanger::new(&self.http, &self.config.github);
        let registration_token = timed(
            STEP_EXCHANGE,
            exchanger.request_registration_token(org, &admin_token),
        )
        .await?;

        let reaped = timed(
            STEP_REAP_VERSIONS,
            destroy_older_versions(&store, &registration_secret),
        )
        .await?;

        let version = timed(
            STEP_SAVE_TOKEN,
            save_registration_token(&store, &registration_secret, &registration_token),
        )
        .await?;

        Ok(RotationReport {
            org: org.to_string(),
            destroyed_versions: reaped.destroyed,
            new_version: version.name,
        })
    }
}

/// Record duration and failure of one step.
async fn timed<T, F>(step: &'static str, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let metrics = get_metrics().await;
    let start = Instant::now();
    let result = operation.await;
    metrics.step_duration.with_label_values(&[step]).observe(start.elapsed().as_secs_f64());
    if result.is_err() {
        metrics.step_failures.with_label_values(&[step]).inc();
    }
    result.with_context(|| format!("step {} failed", step))
}
