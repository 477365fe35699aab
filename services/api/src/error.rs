//! services/api/src/error.rs
//!
//! Defines the primary error type for the service binary and the JSON error body
//! returned by the REST handlers.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use genui_core::{ExportError, GenerateError};
use serde::Serialize;
use utoipa::ToSchema;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

//=========================================================================================
// HTTP Error Responses
//=========================================================================================

/// The body of every non-2xx JSON response.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

/// A user-visible, non-fatal failure of one request.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn session_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Session not found")
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}

impl From<GenerateError> for HttpError {
    fn from(e: GenerateError) -> Self {
        let status = match &e {
            GenerateError::Validation(_) => StatusCode::BAD_REQUEST,
            GenerateError::Session(_) => StatusCode::CONFLICT,
            GenerateError::Generation(_) => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, e.to_string())
    }
}

impl From<ExportError> for HttpError {
    fn from(e: ExportError) -> Self {
        let status = match &e {
            ExportError::NothingToCopy | ExportError::NothingToDownload => {
                StatusCode::BAD_REQUEST
            }
            ExportError::Clipboard(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, e.to_string())
    }
}
