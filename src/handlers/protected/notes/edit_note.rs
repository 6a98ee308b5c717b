use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;

use super::NoteResponse;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::NoteChanges;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_pinned: Option<bool>,
}

/// PUT /edit-note/:noteId - partial update of the caller's note
pub async fn edit_note(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(note_id): Path<String>,
    payload: Result<Json<EditNoteRequest>, JsonRejection>,
) -> ApiResult<NoteResponse> {
    let Json(body) = payload?;

    let changes = NoteChanges {
        title: body.title,
        content: body.content,
        tags: body.tags,
        is_pinned: body.is_pinned,
    };
    let note = state.notes.edit(caller.id, &note_id, changes).await?;

    Ok(ApiResponse::new(NoteResponse { note }).message("Note updated successfully"))
}
