//! Error handling for Brew Lens
//!
//! Provides consistent error responses with a remedial suggestion where the
//! user can act on the failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Analysis pipeline errors
    #[error("Image could not be read")]
    ImageUnreadable,

    #[error("Classifier invocation failed: {0}")]
    ClassifierInvocationFailed(String),

    #[error("No classification results found")]
    NoResultsFound,

    #[error("Classification model unavailable")]
    ModelUnavailable,

    #[error("An analysis is already in progress")]
    AnalysisInProgress,

    // Request errors
    #[error("No image was uploaded")]
    MissingImage,

    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Report the first failing field; field order is not stable
        let mut fields: Vec<(&str, String)> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                (field, message)
            })
            .collect();
        fields.sort();
        match fields.into_iter().next() {
            Some((field, message)) => AppError::validation(field, message),
            None => AppError::validation("input", "Invalid input"),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            suggestion: None,
            field: None,
        }
    }

    fn suggest(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::ImageUnreadable => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::new("IMAGE_UNREADABLE", "The photo could not be read")
                    .suggest("Retake the photo and try again"),
            ),
            AppError::ClassifierInvocationFailed(detail) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail::new(
                    "CLASSIFIER_FAILED",
                    format!("Image classification failed: {}", detail),
                )
                .suggest("Try the analysis again in a moment"),
            ),
            AppError::NoResultsFound => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::new("NO_RESULTS_FOUND", "No coffee could be recognised in the photo")
                    .suggest("Retake the photo closer to the cup in good light"),
            ),
            AppError::ModelUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail::new(
                    "MODEL_UNAVAILABLE",
                    "The classification model is not available",
                )
                .suggest("Check that the classification model is installed and configured"),
            ),
            AppError::AnalysisInProgress => (
                StatusCode::CONFLICT,
                ErrorDetail::new("ANALYSIS_IN_PROGRESS", "Another analysis is still running")
                    .suggest("Wait for the current analysis to finish"),
            ),
            AppError::MissingImage => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    field: Some("image".to_string()),
                    ..ErrorDetail::new("MISSING_IMAGE", "An image file is required")
                }
                .suggest("Attach a photo of your coffee"),
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    field: Some(field.clone()),
                    ..ErrorDetail::new("VALIDATION_ERROR", message.clone())
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("NOT_FOUND", format!("{} not found", resource)),
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("CONFIGURATION_ERROR", format!("Configuration error: {}", msg)),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", msg.clone()),
            ),
        };

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
