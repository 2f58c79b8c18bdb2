// HTTP command handlers
// One module per caller-facing feature

pub mod mix_commands;
pub mod speech_commands;
pub mod upload_commands;
pub mod utility_commands;

pub use mix_commands::mix_audio;
pub use speech_commands::{speech_from_body, speech_from_query};
pub use upload_commands::upload_audio;
pub use utility_commands::{health, log_request};

use std::sync::Arc;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;

use crate::errors::PipelineError;
use crate::models::ErrorResponse;
use crate::services::{ArtifactPublisher, MixPipeline, VoiceSynthesizer};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<MixPipeline>,
    pub synthesizer: Arc<dyn VoiceSynthesizer>,
    pub publisher: Arc<dyn ArtifactPublisher>,
    pub max_upload_bytes: usize,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            return error_response(StatusCode::BAD_REQUEST, self.user_message());
        }
        error!("Request failed at {} stage: {}", self.stage(), self);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, self.user_message())
    }
}
