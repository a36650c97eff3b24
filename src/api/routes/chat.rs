use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
}

/// Blank messages are a no-op answered with `204 No Content`.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    let answer = state.session.lock().await.ask(&request.message).await?;

    Ok(match answer {
        Some(answer) => Json(ChatResponse { answer }).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}
