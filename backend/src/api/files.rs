//! File upload API handler
//!
//! Accepts a multipart batch of documents and returns the processed batch.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

use crate::error::AppError;
use crate::services::{ProcessedBatch, UploadedDocument};
use crate::state::AppState;

/// Multipart field carrying the uploaded files
pub const FILES_FIELD: &str = "files";

fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::InvalidRequest(format!("{}: {}", context, err))
    }
}

/// Process uploaded files
///
/// Every part named `files` is one document. Other parts are ignored.
///
/// # Errors
/// * `AppError::NoFiles` - no `files` part was sent
/// * `AppError::InvalidRequest` - the body is not valid multipart data
/// * `AppError::PayloadTooLarge` - the body exceeds `MAX_UPLOAD_BYTES`
pub async fn process_files(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProcessedBatch>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    let mut documents = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart field", e))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != FILES_FIELD {
            warn!(field = %field_name, "Ignoring unknown multipart field");
            continue;
        }

        let name = field.file_name().unwrap_or("unnamed").to_string();
        let mime_type = field.content_type().unwrap_or("").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(&format!("Failed to read file {}", name), e))?;

        info!(file = %name, mime_type = %mime_type, size = bytes.len(), "Received file");
        documents.push(UploadedDocument::new(name, mime_type, bytes.to_vec()));
    }

    let batch = state.ingestion.process_batch(documents).await?;
    Ok(Json(batch))
}
