use axum::{extract::State, Json};
use diagnosis_engine::ArtifactSummary;
use serde::Serialize;

use crate::server::TriageServer;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime: u64,
    pub artifacts: ArtifactSummary,
}

/// Version information response
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub name: String,
    pub version: String,
}

/// Health check handler
///
/// The artifacts are loaded before the listener binds, so a server that
/// answers is a server that can predict.
pub async fn health_check(State(server): State<TriageServer>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: server.uptime_seconds(),
        artifacts: server.context.summary(),
    })
}

/// Version information handler
pub async fn version_info(State(server): State<TriageServer>) -> Json<VersionResponse> {
    Json(VersionResponse {
        name: server.get_config().name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
