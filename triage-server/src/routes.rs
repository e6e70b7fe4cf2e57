use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers::{health, predict},
    server::TriageServer,
};

/// Create health check routes
pub fn health_routes() -> Router<TriageServer> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/version", get(health::version_info))
}

/// Create prediction routes
pub fn prediction_routes() -> Router<TriageServer> {
    Router::new()
        .route("/predict", post(predict::predict))
        .route("/vocabulary", get(predict::vocabulary))
}

/// Create all application routes
pub fn create_routes() -> Router<TriageServer> {
    Router::new()
        .merge(health_routes())
        .merge(prediction_routes())
}
