use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Logs one line per request; server errors at warn level.
pub async fn request_logger(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status();

    if status.is_server_error() {
        warn!(%request_id, %method, %path, status = status.as_u16(), duration_ms, "Request failed");
    } else {
        info!(%request_id, %method, %path, status = status.as_u16(), duration_ms, "Request completed");
    }

    response
}
