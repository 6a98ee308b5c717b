use axum::{extract::State, Extension};
use serde::Serialize;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::store::User;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

/// GET /get-user - the caller's account; 401 if it has disappeared
pub async fn get_user(State(state): State<AppState>, Extension(caller): Extension<AuthUser>) -> ApiResult<UserResponse> {
    let user = state.accounts.current_user(caller.id).await?;
    Ok(ApiResponse::new(UserResponse { user }).message("User fetched successfully"))
}
