use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use diagnosis_engine::EngineError;
use error_common::codes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

/// Error response body.
///
/// `error` carries the human-readable message and is the only key older
/// clients look at; the remaining fields let newer clients branch on the
/// failure without parsing text.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Error type, one per failure kind
    pub error_type: String,
    /// Stable machine-readable code
    pub error_code: String,
    /// Request field the error refers to, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Unique error ID for correlating with server logs
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Main API error enum
#[derive(Error, Debug)]
pub enum ApiError {
    /// The payload is missing a field, has a wrong-typed field, or fails a
    /// value constraint
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
        code: &'static str,
    },

    /// A categorical value is outside its encoder's vocabulary
    #[error("{message}")]
    UnknownCategory { message: String, field: String },

    /// A classifier rejected the feature vector
    #[error("{message}")]
    ModelInference { message: String },

    #[error("{message}")]
    Internal { message: String },
}

impl ApiError {
    /// Create a validation error tied to one request field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
            code: codes::validation::INVALID_INPUT,
        }
    }

    /// Create a validation error for a required field left blank
    pub fn missing_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
            code: codes::validation::MISSING_REQUIRED_FIELD,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::UnknownCategory { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ModelInference { .. } | ApiError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation_error",
            ApiError::UnknownCategory { .. } => "unknown_category",
            ApiError::ModelInference { .. } => "model_inference_error",
            ApiError::Internal { .. } => "internal_error",
        }
    }

    /// Get the stable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { code, .. } => *code,
            ApiError::UnknownCategory { .. } => codes::encoding::UNKNOWN_CATEGORY,
            ApiError::ModelInference { .. } => codes::inference::MODEL_REJECTED_INPUT,
            ApiError::Internal { .. } => codes::internal::INTERNAL_ERROR,
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            ApiError::Validation { field, .. } => field.as_deref(),
            ApiError::UnknownCategory { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        // Log the error with correlation ID
        if status_code.is_server_error() {
            error!(
                error_id = %error_id,
                error_type = %self.error_type(),
                status_code = %status_code.as_u16(),
                error = %self,
                "API error occurred"
            );
        } else {
            warn!(
                error_id = %error_id,
                error_type = %self.error_type(),
                status_code = %status_code.as_u16(),
                error = %self,
                "Request rejected"
            );
        }

        let error_response = ApiErrorResponse {
            error: self.to_string(),
            error_type: self.error_type().to_string(),
            error_code: self.error_code().to_string(),
            field: self.field().map(str::to_string),
            error_id,
            timestamp: chrono::Utc::now(),
        };

        (status_code, Json(error_response)).into_response()
    }
}

/// Convert engine errors to API errors
impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        match &error {
            EngineError::UnknownCategory { encoder, .. } => ApiError::UnknownCategory {
                field: encoder.clone(),
                message: error.to_string(),
            },
            EngineError::ModelInference { .. } => ApiError::ModelInference {
                message: error.to_string(),
            },
            EngineError::Artifact { .. } | EngineError::Io { .. } | EngineError::Json { .. } => {
                ApiError::internal(error.to_string())
            }
        }
    }
}

/// Convert JSON body rejections to API errors
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let code = match &rejection {
            JsonRejection::JsonDataError(_) => codes::validation::INVALID_INPUT,
            _ => codes::validation::INVALID_FORMAT,
        };
        ApiError::Validation {
            message: rejection.body_text(),
            field: None,
            code,
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
