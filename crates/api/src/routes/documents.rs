use axum::extract::rejection::JsonRejection;
use axum::{extract::State, routing::post, Json, Router};
use document_intake_core::document::dto::DocumentDto;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Document intake routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v3/lk/documents/create", post(create_document))
}

/// Accept a document for the goods-introduction flow.
///
/// The payload passes the admission limiter before anything touches the
/// database; decode failures (malformed JSON, unknown `doc_type`, missing
/// fields) are client errors.
async fn create_document(
    State(state): State<AppState>,
    payload: Result<Json<DocumentDto>, JsonRejection>,
) -> ApiResult<Json<DocumentDto>> {
    let Json(dto) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let created = state.service().create_document(dto).await?;
    Ok(Json(created))
}
