//! Unified API error handling
//!
//! Provides consistent error responses across all endpoints.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{MappingError, ValidationError};
use crate::store::{InvalidIdentifier, StoreError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] InvalidIdentifier),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Stored document is malformed: {0}")]
    Mapping(#[from] MappingError),

    #[error("Document store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Mapping(_) | Self::Store(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Mapping(_) | Self::Internal(_) => "INTERNAL_ERROR",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Validation(e) => e.reason.clone(),
            Self::InvalidIdentifier(e) => e.to_string(),
            Self::NotFound(msg) => msg.clone(),
            // Don't leak internal error details
            Self::Mapping(_) | Self::Internal(_) => "An internal error occurred".to_string(),
            Self::Store(_) => "The document store could not complete the request".to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(ValidationError::new("body", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log internal errors
        match &self {
            Self::Mapping(e) => {
                tracing::error!(error = %e, "Stored document failed to map");
            }
            Self::Store(e) => {
                tracing::error!(error = ?e, "Document store error");
            }
            Self::Internal(e) => {
                tracing::error!(error = ?e, "Internal server error");
            }
            _ => {
                tracing::warn!(error = %self, "API error");
            }
        }

        let status = self.status_code();
        let body = ErrorResponse {
            code: self.error_code().to_string(),
            message: self.public_message(),
            field: match &self {
                Self::Validation(e) => Some(e.field.clone()),
                _ => None,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
