use axum::Json;
use axum::extract::{Extension, Multipart, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::application::ports::{AudioConverter, ConversionError};
use crate::domain::{AudioFormat, UploadedArtifact};
use crate::infrastructure::observability::{RequestId, sanitize_diagnostic};
use crate::presentation::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct ConvertParams {
    pub format: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

#[tracing::instrument(skip(state, multipart, request_id), fields(request_id = %request_id.as_str()))]
pub async fn convert_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<ConvertParams>,
    multipart: Multipart,
) -> Response {
    let target = match params.format.as_deref() {
        None => state.default_format,
        Some(raw) => match raw.parse::<AudioFormat>() {
            Ok(format) => format,
            Err(e) => {
                tracing::warn!(format = %raw, "Unsupported target format requested");
                return error_response(StatusCode::BAD_REQUEST, e);
            }
        },
    };

    convert_upload(state, multipart, target).await
}

/// Fixed-target route for older clients that post to `convert-to-mp3`.
#[tracing::instrument(skip(state, multipart))]
pub async fn convert_to_mp3_handler(State(state): State<AppState>, multipart: Multipart) -> Response {
    convert_upload(state, multipart, AudioFormat::Mp3).await
}

async fn convert_upload(state: AppState, mut multipart: Multipart, target: AudioFormat) -> Response {
    let upload = match read_upload(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            tracing::warn!("Conversion request with no file");
            return error_response(StatusCode::BAD_REQUEST, "No file uploaded.");
        }
        Err(response) => return response,
    };

    if upload.is_empty() {
        tracing::warn!(filename = %upload.filename, "Conversion request with empty file");
        return error_response(StatusCode::BAD_REQUEST, "No file uploaded.");
    }

    tracing::debug!(
        filename = %upload.filename,
        content_type = ?upload.content_type,
        declared = ?upload.declared_format(),
        bytes = upload.len(),
        target = %target,
        "Processing conversion upload"
    );

    match state
        .conversion_service
        .convert(upload, target, CancellationToken::new())
        .await
    {
        Ok(converted) => {
            let disposition = format!("attachment; filename=\"{}\"", converted.download_name());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, converted.media_type().to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                converted.data,
            )
                .into_response()
        }
        Err(e) => conversion_error_response(&e),
    }
}

async fn read_upload(multipart: &mut Multipart) -> Result<Option<UploadedArtifact>, Response> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return Err(error_response(
                    e.status(),
                    format!("Failed to read multipart: {}", e.body_text()),
                ));
            }
        };

        let is_file = field.name() == Some(FILE_FIELD) || field.file_name().is_some();
        if !is_file {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);

        let data = field.bytes().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read file bytes");
            error_response(e.status(), format!("Failed to read file: {}", e.body_text()))
        })?;

        return Ok(Some(UploadedArtifact::new(filename, content_type, data)));
    }
}

pub fn conversion_error_response(error: &ConversionError) -> Response {
    let status = match error {
        ConversionError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ConversionError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        ConversionError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        ConversionError::Network { .. } | ConversionError::UndersizedResponse { .. } => {
            StatusCode::BAD_GATEWAY
        }
        ConversionError::Subprocess { .. }
        | ConversionError::ToolUnavailable(_)
        | ConversionError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(
            kind = %error.kind(),
            error = %sanitize_diagnostic(&error.to_string()),
            "Conversion failed"
        );
    }

    let message = match error {
        ConversionError::Subprocess { .. } => {
            format!("An error occurred during conversion: {}", error)
        }
        ConversionError::Io(_) => "An error occurred during conversion: scratch i/o failed".to_string(),
        other => other.to_string(),
    };

    error_response(status, message)
}
