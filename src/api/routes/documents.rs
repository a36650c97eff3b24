use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::api::{error::ApiError, state::AppState};
use crate::application::IngestSummary;
use crate::domain::Document;

/// Ingests every uploaded file as one document set, replacing the current one.
pub async fn upload_documents(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestSummary>, ApiError> {
    let mut documents = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        // Plain form fields carry no file name.
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        tracing::debug!(document = %name, size = bytes.len(), "received upload");
        documents.push(Document::from_bytes(name, bytes.to_vec()));
    }

    if documents.is_empty() {
        return Err(ApiError::bad_request("no files uploaded"));
    }

    let summary = state.session.lock().await.ingest_all(documents).await?;
    Ok(Json(summary))
}
