use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

/// Request timing middleware
pub async fn request_timing_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let elapsed = start.elapsed();

    tracing::info!(
        method = %method,
        uri = %uri,
        duration_ms = elapsed.as_millis(),
        status = response.status().as_u16(),
        "Request processed"
    );

    response
}

/// Parse one configured CORS origin: `http://` or `https://` and a host with
/// an optional port, nothing more.
///
/// # Errors
///
/// Returns a message naming the origin when it is not of that form.
pub fn parse_cors_origin(origin: &str) -> Result<HeaderValue, String> {
    let authority = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
        .ok_or_else(|| format!("CORS origin {origin:?} must start with http:// or https://"))?;

    if authority.is_empty()
        || authority.contains(['/', '?', '#'])
        || authority.chars().any(char::is_whitespace)
    {
        return Err(format!(
            "CORS origin {origin:?} must be a scheme and host with no path"
        ));
    }

    HeaderValue::from_str(origin)
        .map_err(|_| format!("CORS origin {origin:?} is not a valid header value"))
}

/// Create CORS layer for the application
///
/// Only `POST` is allowed cross-origin. An empty `origins` list allows any
/// origin. `TriageServer::new` rejects malformed origins before this runs;
/// any that still reach here are skipped with a warning.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match parse_cors_origin(origin) {
                Ok(value) => Some(value),
                Err(reason) => {
                    warn!(origin = %origin, reason = %reason, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}
