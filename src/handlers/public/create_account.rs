use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::store::User;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountResponse {
    pub user: User,
    pub access_token: String,
}

/// POST /create-account - register and receive an access token
///
/// Body: `{ "fullName": "...", "email": "...", "password": "..." }`
pub async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> ApiResult<CreateAccountResponse> {
    let Json(body) = payload?;

    let signed_in = state
        .accounts
        .create_account(body.full_name, body.email, body.password)
        .await?;

    Ok(ApiResponse::new(CreateAccountResponse {
        user: signed_in.user,
        access_token: signed_in.access_token,
    })
    .message("User created successfully"))
}
