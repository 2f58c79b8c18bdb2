use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use log::warn;

use super::{AppState, error_response};
use crate::models::{AUDIO_MPEG, SpeechRequest};

/// `GET /api/speech?text=...&voice=...`
pub async fn speech_from_query(
    State(state): State<AppState>,
    Query(request): Query<SpeechRequest>,
) -> Response {
    synthesize(&state, request).await
}

/// `POST /api/speech` with `{text, voice?}`
pub async fn speech_from_body(
    State(state): State<AppState>,
    payload: Result<Json<SpeechRequest>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(request)) => synthesize(&state, request).await,
        Err(rejection) => {
            warn!("Rejected speech request body: {}", rejection);
            error_response(StatusCode::BAD_REQUEST, "Text is required")
        }
    }
}

async fn synthesize(state: &AppState, request: SpeechRequest) -> Response {
    let (text, voice) = match request.validate() {
        Ok(valid) => valid,
        Err(e) => return e.into_response(),
    };

    match state.synthesizer.synthesize(&text, &voice).await {
        Ok(audio) => ([(CONTENT_TYPE, AUDIO_MPEG)], audio).into_response(),
        Err(e) => e.into_response(),
    }
}
