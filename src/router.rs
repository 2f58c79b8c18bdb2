use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::commands::{
    AppState, health, log_request, mix_audio, speech_from_body, speech_from_query, upload_audio,
};

/// Room for multipart boundaries and headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes + MULTIPART_OVERHEAD);

    Router::new()
        .route("/", get(health))
        .route("/api/mix-audio", post(mix_audio))
        .route("/api/speech", get(speech_from_query).post(speech_from_body))
        .route("/api/upload-audio", post(upload_audio).layer(upload_limit))
        .layer(middleware::from_fn(log_request))
        .layer(cors)
        .with_state(state)
}
