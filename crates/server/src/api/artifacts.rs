//! Output artifact API handlers.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use lectern_core::{ArchiveError, Artifact, ArtifactError, StatsRecord};
use serde::Serialize;
use tokio_util::io::ReaderStream;
use tracing::error;

use super::handlers::{api_error, ApiError};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub files: Vec<Artifact>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
    pub deleted: usize,
}

// ============================================================================
// Error mapping
// ============================================================================

fn artifact_error(error: ArtifactError) -> ApiError {
    if error.is_not_found() {
        return api_error(StatusCode::NOT_FOUND, error.to_string());
    }
    error!("Artifact store error: {}", error);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
}

fn archive_error(error: ArchiveError) -> ApiError {
    match error {
        ArchiveError::NotFound => api_error(StatusCode::NOT_FOUND, error.to_string()),
        ArchiveError::Artifacts(e) => artifact_error(e),
        e => {
            error!("Failed to build bundle: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// `attachment; filename="..."` with quotes and backslashes escaped.
///
/// Non-ASCII names get an ASCII fallback plus an RFC 5987 `filename*`.
fn attachment(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect();
    let escaped = fallback.replace('\\', "\\\\").replace('"', "\\\"");
    if filename.is_ascii() {
        return format!("attachment; filename=\"{}\"", escaped);
    }
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        escaped,
        urlencoding::encode(filename)
    )
}

fn audio_content_type(name: &str) -> &'static str {
    let ext = name.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "m4a" => "audio/mp4",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/files
///
/// List generated audio files, sorted by name. Empty before any conversion.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FileListResponse>, ApiError> {
    let files = state
        .lectern()
        .list_artifacts()
        .await
        .map_err(artifact_error)?;
    Ok(Json(FileListResponse { files }))
}

/// GET /api/download/{name}
///
/// Stream a single audio file as an attachment.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let opened = state
        .lectern()
        .open_artifact(&name)
        .await
        .map_err(artifact_error)?;

    let body = Body::from_stream(ReaderStream::new(opened.file));
    Ok((
        [
            (header::CONTENT_TYPE, audio_content_type(&name).to_string()),
            (header::CONTENT_LENGTH, opened.artifact.size.to_string()),
            (header::CONTENT_DISPOSITION, attachment(&name)),
        ],
        body,
    )
        .into_response())
}

/// GET /api/download-zip
///
/// Stream every audio file as one zip. The temporary bundle is removed once
/// the response body is dropped, whether or not it was fully sent.
pub async fn download_zip(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let bundle = state
        .lectern()
        .build_archive()
        .await
        .map_err(archive_error)?;
    let size = bundle.size();

    let reader = bundle.into_reader().await.map_err(|e| {
        error!("Failed to open bundle: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let body = Body::from_stream(ReaderStream::new(reader));
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_LENGTH, size.to_string()),
            (
                header::CONTENT_DISPOSITION,
                attachment(&state.config().storage.bundle_name),
            ),
        ],
        body,
    )
        .into_response())
}

/// POST /api/clear
///
/// Delete every generated audio file.
pub async fn clear_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearResponse>, ApiError> {
    let deleted = state
        .lectern()
        .clear_artifacts()
        .await
        .map_err(artifact_error)?;

    let message = if deleted == 0 {
        "No audio files to delete".to_string()
    } else {
        format!("Deleted {} file(s)", deleted)
    };

    Ok(Json(ClearResponse {
        success: true,
        message,
        deleted,
    }))
}

/// GET /api/stats
///
/// Stats record of the most recent conversion.
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsRecord>, ApiError> {
    state
        .lectern()
        .stats()
        .await
        .map(Json)
        .map_err(artifact_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_escapes_quotes() {
        assert_eq!(
            attachment("part \"1\".mp3"),
            "attachment; filename=\"part \\\"1\\\".mp3\""
        );
        assert_eq!(attachment("book.zip"), "attachment; filename=\"book.zip\"");
    }

    #[test]
    fn test_attachment_non_ascii_adds_extended_name() {
        assert_eq!(
            attachment("capítulo 1.mp3"),
            "attachment; filename=\"cap_tulo 1.mp3\"; filename*=UTF-8''cap%C3%ADtulo%201.mp3"
        );
    }

    #[test]
    fn test_audio_content_type() {
        assert_eq!(audio_content_type("part_001.MP3"), "audio/mpeg");
        assert_eq!(audio_content_type("part_001.wav"), "audio/wav");
        assert_eq!(audio_content_type("noext"), "application/octet-stream");
    }
}
