use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use diagnosis_engine::InferenceContext;
use error_common::{Result, TriageError};
use tracing::info;

use crate::middleware::parse_cors_origin;

/// Main triage server state
#[derive(Clone)]
pub struct TriageServer {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Loaded models and encoders, read-only for the life of the process
    pub context: Arc<InferenceContext>,
    /// When the server state was built
    pub started_at: Instant,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Server name
    pub name: String,
    /// Bind address
    pub host: IpAddr,
    /// Bind port
    pub port: u16,
    /// Directory holding the model and encoder artifacts
    pub artifact_dir: PathBuf,
    /// Origins allowed to POST cross-origin; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Check the settings that cannot be expressed in their types.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::ConfigError`] for the first malformed CORS
    /// origin.
    pub fn validate(&self) -> Result<()> {
        for origin in &self.cors_origins {
            parse_cors_origin(origin).map_err(TriageError::ConfigError)?;
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "Triage Inference Service".to_string(),
            host: IpAddr::from([0, 0, 0, 0]),
            port: 5001,
            artifact_dir: PathBuf::from("artifacts"),
            cors_origins: Vec::new(),
        }
    }
}

impl TriageServer {
    /// Create a new triage server, loading every artifact from
    /// `config.artifact_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::ConfigError`] if the configuration is invalid,
    /// and [`TriageError::ArtifactError`] if any artifact is missing or
    /// invalid.
    pub fn new(config: ServerConfig) -> Result<Self> {
        config.validate()?;
        info!(artifact_dir = %config.artifact_dir.display(), "Loading model artifacts");
        let context = InferenceContext::load(&config.artifact_dir)
            .map_err(|e| TriageError::ArtifactError(e.to_string()))?;
        Ok(Self::with_context(config, context))
    }

    /// Create a server around an already-built inference context.
    ///
    /// The configuration is taken as given; call [`ServerConfig::validate`]
    /// first if it came from outside the process.
    pub fn with_context(config: ServerConfig, context: InferenceContext) -> Self {
        Self {
            config: Arc::new(config),
            context: Arc::new(context),
            started_at: Instant::now(),
        }
    }

    /// Get server configuration
    pub fn get_config(&self) -> &ServerConfig {
        &self.config
    }

    /// Seconds since the server state was built
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_can_be_cloned() {
        // TriageServer must be Clone for use with Axum
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<TriageServer>();
    }

    #[test]
    fn test_default_bind_address() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:5001");
    }

    #[test]
    fn test_missing_artifacts_fail_startup() {
        let config = ServerConfig {
            artifact_dir: PathBuf::from("/nonexistent/triage-artifacts"),
            ..ServerConfig::default()
        };
        let err = TriageServer::new(config).err().unwrap();
        assert!(matches!(err, TriageError::ArtifactError(_)));
    }

    #[test]
    fn test_malformed_cors_origin_fails_startup() {
        let config = ServerConfig {
            cors_origins: vec![
                "https://clinic.example".to_string(),
                "localhost:3000".to_string(),
            ],
            artifact_dir: PathBuf::from("/nonexistent/triage-artifacts"),
            ..ServerConfig::default()
        };
        let err = TriageServer::new(config).err().unwrap();
        match err {
            TriageError::ConfigError(message) => assert!(message.contains("localhost:3000")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_well_formed_cors_origins_pass_validation() {
        let config = ServerConfig {
            cors_origins: vec!["http://localhost:3000".to_string()],
            ..ServerConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
