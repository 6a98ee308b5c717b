use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;

use super::NoteResponse;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinRequest {
    pub is_pinned: Option<bool>,
}

/// PUT /update-pin-status/:noteId - change only the pinned flag
pub async fn update_pin_status(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(note_id): Path<String>,
    payload: Result<Json<PinRequest>, JsonRejection>,
) -> ApiResult<NoteResponse> {
    let Json(body) = payload?;

    let note = state.notes.set_pinned(caller.id, &note_id, body.is_pinned).await?;

    Ok(ApiResponse::new(NoteResponse { note }).message("Note updated successfully"))
}
