use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension,
};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::store::Note;

/// Raw strings so that junk values fall back to defaults instead of failing.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesPage {
    pub notes: Vec<Note>,
    pub total_count: i64,
    pub current_page: u32,
    pub total_pages: i64,
}

/// GET /get-all-notes?page=&limit= - pinned first, then newest first
pub async fn get_all_notes(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<NotesPage> {
    let Query(params) = query?;

    let listing = state
        .notes
        .list(caller.id, params.page.as_deref(), params.limit.as_deref())
        .await?;

    Ok(ApiResponse::new(NotesPage {
        notes: listing.notes,
        total_count: listing.total,
        current_page: listing.current_page,
        total_pages: listing.total_pages,
    })
    .message("Notes fetched successfully"))
}
