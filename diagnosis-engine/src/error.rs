use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The value was never seen when the encoder was fitted
    #[error("{encoder} encoder: unrecognised category {value:?}")]
    UnknownCategory { encoder: String, value: String },

    /// The classifier could not score the feature vector
    #[error("{model} model rejected the feature vector: {message}")]
    ModelInference { model: String, message: String },

    /// The artifact parsed but does not describe a usable model or encoder
    #[error("Invalid artifact {artifact}: {message}")]
    Artifact { artifact: String, message: String },

    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed artifact {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl EngineError {
    pub(crate) fn artifact(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Artifact {
            artifact: artifact.into(),
            message: message.into(),
        }
    }

    pub(crate) fn inference(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModelInference {
            model: model.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
