use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use serde::Deserialize;

use super::NoteResponse;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct AddNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// POST /add-note - create a note owned by the caller
pub async fn add_note(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    payload: Result<Json<AddNoteRequest>, JsonRejection>,
) -> ApiResult<NoteResponse> {
    let Json(body) = payload?;

    let note = state.notes.add(caller.id, body.title, body.content, body.tags).await?;

    Ok(ApiResponse::new(NoteResponse { note }).message("Note added successfully"))
}
