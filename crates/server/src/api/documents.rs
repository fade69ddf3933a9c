//! Upload slot and conversion API handlers.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use lectern_core::{ConvertError, PipelineOutput, StagedDocument, StagingError};
use serde::Serialize;
use tracing::{error, warn};

use super::handlers::{api_error, ApiError};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub filename: String,
    pub message: String,
}

// ============================================================================
// Error mapping
// ============================================================================

fn staging_error(error: StagingError) -> ApiError {
    let status = if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    api_error(status, error.to_string())
}

fn convert_error(error: ConvertError) -> ApiError {
    match error {
        ConvertError::Staging(e) => staging_error(e),
        e @ (ConvertError::PipelineFailure { .. } | ConvertError::Timeout { .. }) => {
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/upload
///
/// Stage a document from the multipart field named after the document
/// extension (`pdf` by default), replacing any previously staged document.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let lectern = state.lectern();
    let extension = lectern.slot().extension().to_string();

    let mut document = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Malformed upload: {}", e);
                return Err(api_error(e.status(), e.body_text()));
            }
        };

        if field.name() != Some(extension.as_str()) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        match field.bytes().await {
            Ok(bytes) => document = Some((filename, bytes)),
            Err(e) => {
                warn!("Failed to read upload {:?}: {}", filename, e);
                return Err(api_error(e.status(), e.body_text()));
            }
        }
        break;
    }

    let (filename, bytes) = document.ok_or_else(|| {
        staging_error(StagingError::invalid_input(format!(
            "No {} file provided",
            extension.to_uppercase()
        )))
    })?;

    let staged = lectern
        .upload(&filename, &bytes[..])
        .await
        .map_err(staging_error)?;

    Ok(Json(UploadResponse {
        success: true,
        message: format!("{} uploaded successfully", extension.to_uppercase()),
        filename: staged.filename,
    }))
}

/// GET /api/document
///
/// The currently staged document.
pub async fn current_document(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StagedDocument>, ApiError> {
    state
        .lectern()
        .current_document()
        .await
        .map(Json)
        .map_err(staging_error)
}

/// POST /api/convert
///
/// Run the pipeline on the staged document and return its result verbatim.
///
/// The run is spawned onto its own task, so a client that disconnects does
/// not cancel the pipeline. Only the configured timeout can.
pub async fn convert(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PipelineOutput>, ApiError> {
    let lectern = state.shared_lectern();
    let run = tokio::spawn(async move { lectern.convert().await });

    match run.await {
        Ok(result) => result.map(Json).map_err(convert_error),
        Err(e) => {
            error!("Conversion task failed: {}", e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Conversion task failed",
            ))
        }
    }
}
