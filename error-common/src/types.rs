use thiserror::Error;

/// Process-level errors raised while bringing the service up.
///
/// Request-path failures never end up here; they are mapped to HTTP
/// responses at the server boundary.
#[derive(Error, Debug)]
pub enum TriageError {
    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A model or encoder artifact could not be loaded
    #[error("Artifact error: {0}")]
    ArtifactError(String),

    /// Network communication errors
    #[error("Network error: {0}")]
    NetworkError(String),

    /// HTTP server errors
    #[error("Server error: {0}")]
    ServerError(String),
}

impl TriageError {
    /// Short, stable name of the failure class, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            TriageError::ConfigError(_) => "config",
            TriageError::ArtifactError(_) => "artifact",
            TriageError::NetworkError(_) => "network",
            TriageError::ServerError(_) => "server",
        }
    }
}

/// Result type alias for service start-up operations
pub type Result<T> = std::result::Result<T, TriageError>;

/// Log a start-up failure with its context
pub fn log_error(context: &str, error: &TriageError) {
    tracing::error!(
        context = context,
        kind = error.kind(),
        error = %error,
        "Triage service error occurred"
    );
}
