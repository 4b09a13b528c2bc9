use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;
use http::StatusCode;
use tracing::{error, info, warn};

use crate::config::settings::ServerConfig;
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::rotation::handler::RotationHandler;
use crate::rotation::org::OrganizationName;
use crate::trigger::pubsub::PushEnvelope;

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub handler: Arc<RotationHandler>,
}

impl AppState {
    pub fn new (
        metrics: &Metrics,
        handler: Arc<RotationHandler>,
    ) -> Self{
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            handler,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(receive_push))
        .route("/healthz", get(healthz))
        .merge(state.metrics_state.router())
        .with_state(state)
}

/// Serve the push endpoint until ctrl-c.
pub async fn start(server_config: &ServerConfig, handler: Arc<RotationHandler>) -> Result<()> {
    let metrics = get_metrics().await;
    let app = router(AppState::new(metrics, handler));

    let bind_addr = server_config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("listening on {}", bind_addr);
    metrics.up.set(1);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("push server failed")?;

    metrics.up.set(0);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("shutting down push server");
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// 204 once rotated, 400 for payloads no retry can fix, 500 so the
/// subscription redelivers after a failed rotation.
async fn receive_push(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let envelope = match PushEnvelope::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!("rejected push: {:#}", err);
            return StatusCode::BAD_REQUEST;
        }
    };

    let message_id = envelope.message.message_id.clone().unwrap_or_default();
    let org = match envelope
        .message
        .organization()
        .and_then(|raw| OrganizationName::parse(&raw))
    {
        Ok(org) => org,
        Err(err) => {
            get_metrics().await.rotations.with_label_values(&["rejected"]).inc();
            warn!(%message_id, "rejected push: {:#}", err);
            return StatusCode::BAD_REQUEST;
        }
    };

    info!(%message_id, %org, "push received");
    match state.handler.rotate_org(&org).await {
        Ok(_) => StatusCode::NO_CONTENT,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
