pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Minimal identity claim carried by every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Fails instead of wrapping or panicking when the lifetime is out of
    /// range for a timestamp.
    pub fn new(id: Uuid, email: impl Into<String>, expiry_hours: u64) -> Result<Self, AuthError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AuthError::TokenCreation(format!("token lifetime of {} hours is out of range", expiry_hours))
            })?;

        Ok(Self {
            id,
            email: email.into(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Authorization header must use Bearer token format")]
    MalformedHeader,

    #[error("Invalid or expired token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Token could not be issued: {0}")]
    TokenCreation(String),

    #[error("Token secret not configured")]
    InvalidSecret,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

/// Signs and verifies HS256 access tokens with the server secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: u64,
}

impl TokenKeys {
    pub fn from_config(security: &SecurityConfig) -> Result<Self, AuthError> {
        if security.jwt_secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }
        let secret = security.jwt_secret.as_bytes();
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            expiry_hours: security.jwt_expiry_hours,
        })
    }

    pub fn issue(&self, id: Uuid, email: &str) -> Result<String, AuthError> {
        let claims = Claims::new(id, email, self.expiry_hours)?;
        encode(&Header::default(), &claims, &self.encoding).map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Checks signature and expiry; expiry gets no leeway.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.ok_or(AuthError::MissingToken)?;
    let token = value.strip_prefix("Bearer ").ok_or(AuthError::MalformedHeader)?.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys_with_expiry(secret: &str, jwt_expiry_hours: u64) -> TokenKeys {
        TokenKeys::from_config(&SecurityConfig {
            jwt_secret: secret.to_string(),
            jwt_expiry_hours,
            cors_origins: vec![],
        })
        .unwrap()
    }

    fn keys(secret: &str) -> TokenKeys {
        keys_with_expiry(secret, 1)
    }

    #[test]
    fn issued_token_round_trips_minimal_claims() {
        let keys = keys("test-secret");
        let id = Uuid::new_v4();
        let token = keys.issue(id, "ada@example.com").unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.id, id);
        assert_eq!(claims.email, "ada@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = keys("one").issue(Uuid::new_v4(), "a@example.com").unwrap();
        assert!(matches!(keys("two").verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let keys = keys("test-secret");
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: Uuid::new_v4(),
            email: "a@example.com".into(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn oversized_lifetime_fails_to_issue() {
        for hours in [u64::MAX, 10_000_000_000_000_000] {
            let result = keys_with_expiry("test-secret", hours).issue(Uuid::new_v4(), "a@example.com");
            assert!(matches!(result, Err(AuthError::TokenCreation(_))), "{} hours", hours);
        }
    }

    #[test]
    fn ten_year_lifetime_still_verifies() {
        let keys = keys_with_expiry("test-secret", 87_600);
        let token = keys.issue(Uuid::new_v4(), "a@example.com").unwrap();
        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn empty_secret_is_refused() {
        let result = TokenKeys::from_config(&SecurityConfig {
            jwt_secret: String::new(),
            jwt_expiry_hours: 1,
            cors_origins: vec![],
        });
        assert!(matches!(result, Err(AuthError::InvalidSecret)));
    }

    #[test]
    fn parses_bearer_header() {
        assert_eq!(bearer_token(Some("Bearer abc.def")).unwrap(), "abc.def");
        assert!(matches!(bearer_token(None), Err(AuthError::MissingToken)));
        assert!(matches!(bearer_token(Some("Bearer   ")), Err(AuthError::MissingToken)));
        assert!(matches!(bearer_token(Some("Basic abc")), Err(AuthError::MalformedHeader)));
    }
}
