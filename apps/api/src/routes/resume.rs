//! Axum route handlers for compiling and downloading resumes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::Serialize;
use tokio::fs;
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::{validate, ResumeRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResponse {
    pub success: bool,
    pub message: String,
    pub pdf_url: String,
    pub pdf_base64: String,
}

/// POST /api/compile-resume
///
/// Validates, compiles, then returns the artifact both inline (base64) and as a
/// download URL.
pub async fn handle_compile(
    State(state): State<AppState>,
    payload: Result<Json<ResumeRequest>, JsonRejection>,
) -> Result<Json<CompileResponse>, AppError> {
    let Json(request) = payload?;
    validate(&request).map_err(AppError::Validation)?;

    let name = state.compiler.compile(&request).await?;

    let pdf = fs::read(state.compiler.output_dir().join(&name))
        .await
        .map_err(|e| AppError::PdfRead(e.to_string()))?;
    info!("Compiled {name}");

    Ok(Json(CompileResponse {
        success: true,
        message: "Resume compiled successfully".to_string(),
        pdf_url: format!("/api/download/{name}"),
        pdf_base64: STANDARD.encode(&pdf),
    }))
}

/// GET /api/download/:filename
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let filename = base_name(&filename).ok_or(AppError::NotFound)?;
    let path = state.compiler.output_dir().join(filename);

    let pdf = match fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(AppError::NotFound),
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("failed to read {}", path.display()))
                .into())
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        Bytes::from(pdf),
    )
        .into_response())
}

/// Final path component of `raw`, treating both `/` and `\` as separators.
fn base_name(raw: &str) -> Option<&str> {
    raw.rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}
