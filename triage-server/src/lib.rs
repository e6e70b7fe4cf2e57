//! Triage Server - diagnosis and treatment recommendations over HTTP
//!
//! This library provides the HTTP surface of the triage inference service:
//! routing, CORS, request validation and the mapping of engine failures to
//! HTTP responses. The inference itself lives in `diagnosis-engine`.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod validation;

// Re-export commonly used types
pub use error::*;
pub use server::{ServerConfig, TriageServer};

use axum::{middleware::from_fn, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes and middleware
pub fn create_app(server: TriageServer) -> Router {
    let cors = middleware::create_cors_layer(&server.config.cors_origins);

    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(from_fn(middleware::request_timing_middleware)),
        )
        .with_state(server)
}
