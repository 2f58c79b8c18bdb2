use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use log::info;

/// `GET /`
pub async fn health() -> &'static str {
    "Music Card API is running!"
}

/// Logs every request as `[timestamp] METHOD path`.
pub async fn log_request(request: Request, next: Next) -> Response {
    info!(
        "[{}] {} {}",
        Utc::now().to_rfc3339(),
        request.method(),
        request.uri().path()
    );
    next.run(request).await
}
