use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension,
};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::store::Note;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub notes: Vec<Note>,
    pub total_notes: i64,
    pub current_page: u32,
    pub total_pages: i64,
}

/// GET /search-notes?query=&page=&limit= - literal, case-insensitive match
/// on title, content or any tag
pub async fn search_notes(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<SearchPage> {
    let Query(params) = query?;

    let listing = state
        .notes
        .search(
            caller.id,
            params.query.as_deref(),
            params.page.as_deref(),
            params.limit.as_deref(),
        )
        .await?;

    Ok(ApiResponse::new(SearchPage {
        notes: listing.notes,
        total_notes: listing.total,
        current_page: listing.current_page,
        total_pages: listing.total_pages,
    })
    .message("Notes fetched successfully"))
}
