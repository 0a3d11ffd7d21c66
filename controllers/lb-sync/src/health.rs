//! Process health endpoint
//!
//! Answers `GET`/`HEAD /` for an external supervisor: 200 with an `OK`
//! body only when both the metadata store and the controller respond to a
//! read-only probe, 503 otherwise. Runs as its own task and shares no
//! mutable state with the reconciliation loop.

use crate::error::ControllerError;
use avi_client::AviClientTrait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use metadata_client::MetadataClientTrait;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Probe targets for the health endpoint
#[derive(Clone)]
pub struct HealthState {
    pub metadata: Arc<dyn MetadataClientTrait>,
    pub avi: Arc<dyn AviClientTrait>,
    pub cloud_name: String,
}

/// Build the health router.
pub fn router(state: HealthState) -> Router {
    Router::new()
        .route("/", get(healthcheck))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthcheck(State(state): State<HealthState>) -> Response {
    if let Err(e) = state.metadata.self_stack().await {
        error!("metadata health check failed: {}", e);
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    if let Err(e) = state.avi.resolve_cloud_ref(&state.cloud_name).await {
        error!("controller health check failed: {}", e);
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    (StatusCode::OK, "OK").into_response()
}

/// Serve the health endpoint until the shutdown signal fires.
pub async fn serve(
    addr: String,
    state: HealthState,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), ControllerError> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("healthcheck handler is listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.changed().await;
        })
        .await?;

    Ok(())
}
