use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::{bearer_token, AuthError, Claims};
use crate::error::ApiError;

/// Authenticated caller extracted from the access token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
        }
    }
}

/// Rejects the request with 401 unless it carries a valid bearer token, then
/// injects the caller as an `AuthUser` extension.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = {
        let header = request
            .headers()
            .get(AUTHORIZATION)
            .map(|value| value.to_str().map_err(|_| AuthError::MalformedHeader))
            .transpose()?;
        let token = bearer_token(header)?;
        state.tokens.verify(token).map_err(|e| {
            tracing::debug!("Rejected access token: {}", e);
            e
        })?
    };

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}
