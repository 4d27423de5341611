use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::latex::CompileError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request format: {0}")]
    RequestFormat(String),

    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("LaTeX compilation failed: {0}")]
    Compilation(CompileError),

    #[error("Failed to read generated PDF: {0}")]
    PdfRead(String),

    #[error("PDF not found")]
    NotFound,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<CompileError> for AppError {
    fn from(e: CompileError) -> Self {
        match e {
            CompileError::ArtifactRead { .. } => AppError::PdfRead(e.to_string()),
            other => AppError::Compilation(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::RequestFormat(rejection.body_text())
    }
}

/// Error body shared by the compile endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ErrorResponse {
    fn new(error: &'static str, details: Vec<String>) -> Self {
        Self {
            success: false,
            error,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::RequestFormat(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Invalid request format", vec![msg]),
            ),
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Validation failed", errors),
            ),
            AppError::Compilation(e) => {
                tracing::error!("Compilation error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("LaTeX compilation failed", vec![e.to_string()]),
                )
            }
            AppError::PdfRead(msg) => {
                tracing::error!("PDF read error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Failed to read generated PDF", vec![msg]),
                )
            }
            AppError::NotFound => {
                return (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "PDF not found" })),
                )
                    .into_response();
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "Internal server error",
                        vec!["An internal server error occurred".to_string()],
                    ),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
