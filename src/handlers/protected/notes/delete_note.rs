use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::{Map, Value};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// DELETE /delete-note/:noteId - remove the caller's note
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(note_id): Path<String>,
) -> ApiResult<Map<String, Value>> {
    state.notes.delete(caller.id, &note_id).await?;
    Ok(ApiResponse::message_only("Note deleted successfully"))
}
