use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Every way a generation request can fail. Each variant maps to exactly one
/// HTTP status and one JSON error body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Invalid parameter format: {0}")]
    InvalidParameterFormat(String),
    #[error("Server configuration error: {0}")]
    ServerMisconfiguration(String),
    #[error("No image generated: {0}")]
    GenerationFailed(String),
    #[error("Failed to fetch image: {0}")]
    FetchFailed(String),
    #[error("Internal server error: {0}")]
    InternalError(String),
}

/// Wire shape of a failed response.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl RelayError {
    /// Short summary returned to the caller in the `error` field.
    pub fn summary(&self) -> String {
        match self {
            RelayError::InvalidRequest(msg) => msg.clone(),
            RelayError::InvalidParameterFormat(_) => "Invalid parameter format".to_string(),
            RelayError::ServerMisconfiguration(msg) => {
                format!("Server configuration error: {}", msg)
            }
            RelayError::GenerationFailed(_) => "No image generated".to_string(),
            RelayError::FetchFailed(_) => "Failed to fetch image".to_string(),
            RelayError::InternalError(_) => "Internal server error".to_string(),
        }
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            RelayError::InvalidRequest(_) | RelayError::ServerMisconfiguration(_) => None,
            RelayError::InvalidParameterFormat(msg)
            | RelayError::GenerationFailed(msg)
            | RelayError::FetchFailed(msg)
            | RelayError::InternalError(msg) => Some(msg),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.summary(),
            details: self.details().map(String::from),
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RelayError::InvalidRequest(_) | RelayError::InvalidParameterFormat(_)
        )
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
