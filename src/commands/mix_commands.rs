use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::warn;

use super::{AppState, error_response};
use crate::models::{MixAudioRequest, MixAudioResponse};

/// `POST /api/mix-audio`
pub async fn mix_audio(
    State(state): State<AppState>,
    payload: Result<Json<MixAudioRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected mix request body: {}", rejection);
            return error_response(StatusCode::BAD_REQUEST, "Text and bgUrl are required");
        }
    };

    match state.pipeline.run(request).await {
        Ok(outcome) => Json(MixAudioResponse {
            mix_url: outcome.mix_url,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}
