//! Liveness endpoints.
//!
//! Neither endpoint touches the platform client or the credential.

use crate::state::{AppState, ServiceInfo};
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    /// Service name and version.
    #[serde(flatten)]
    pub service: ServiceInfo,
    /// Always `running` while the process serves requests.
    pub status: &'static str,
}

/// Service identification.
///
/// ```text
/// GET /
/// {"name": "notebridge", "version": "0.1.0", "status": "running"}
/// ```
#[allow(clippy::unused_async)]
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        service: state.service,
        status: "running",
    })
}

/// Simple health check endpoint (for basic liveness).
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
