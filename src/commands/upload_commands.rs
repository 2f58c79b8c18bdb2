use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, info, warn};

use super::{AppState, error_response};
use crate::models::{Artifact, UploadResponse};

const AUDIO_FIELD: &str = "audio";

/// `POST /api/upload-audio`, multipart with an `audio` file field.
/// Stores the user's own background track and returns its public URL.
pub async fn upload_audio(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let artifact = loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return error_response(StatusCode::BAD_REQUEST, "No audio file provided");
            }
            Err(e) => {
                warn!("Malformed multipart upload: {}", e);
                return error_response(e.status(), e.body_text());
            }
        };

        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to read uploaded audio: {}", e);
                return error_response(e.status(), e.body_text());
            }
        };

        if bytes.len() > state.max_upload_bytes {
            return error_response(StatusCode::PAYLOAD_TOO_LARGE, "Audio file is too large");
        }

        break Artifact::upload(file_name.as_deref(), content_type.as_deref(), bytes);
    };

    info!("Uploading custom track as {}", artifact.filename);
    match state.publisher.publish(artifact).await {
        Ok(url) => Json(UploadResponse { url }).into_response(),
        Err(e) => {
            error!("Error uploading audio: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to upload audio to storage",
            )
        }
    }
}
