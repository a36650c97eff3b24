use axum::{extract::State, http::StatusCode};

use crate::api::state::AppState;

/// Drops the index and the conversation.
pub async fn clear_session(State(state): State<AppState>) -> StatusCode {
    state.session.lock().await.clear();
    StatusCode::NO_CONTENT
}
