use std::sync::Arc;

use uuid::Uuid;

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::{AuthError, TokenKeys};
use crate::store::{NewUser, Store, StoreError, User};

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("User already exists")]
    AlreadyExists,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User no longer exists")]
    UnknownUser,
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            // Two sign-ups racing past the existence check
            StoreError::DuplicateEmail(_) => AccountError::AlreadyExists,
            other => AccountError::Store(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: User,
    pub access_token: String,
}

/// Sign-up, login and current-user lookup.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
    tokens: TokenKeys,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, tokens: TokenKeys) -> Self {
        Self { store, tokens }
    }

    pub async fn create_account(
        &self,
        full_name: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<SignedIn, AccountError> {
        let full_name = required(full_name, "Full name is required")?;
        let email = required(email.map(|e| e.trim().to_string()), "Email is required")?;
        let password = required(password, "Password is required")?;

        if self.store.find_user_by_email(&email).await?.is_some() {
            tracing::info!("Sign-up rejected, email already registered: {}", email);
            return Err(AccountError::AlreadyExists);
        }

        let password_hash = hash_password_blocking(password).await?;
        let user = self
            .store
            .insert_user(NewUser {
                full_name,
                email,
                password_hash,
            })
            .await?;

        let access_token = self.tokens.issue(user.id, &user.email)?;
        tracing::info!("User created: {} ({})", user.email, user.id);
        Ok(SignedIn { user, access_token })
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: Option<String>, password: Option<String>) -> Result<SignedIn, AccountError> {
        let email = required(email.map(|e| e.trim().to_string()), "Email is required")?;
        let password = required(password, "Password is required")?;

        let Some(user) = self.store.find_user_by_email(&email).await? else {
            tracing::warn!("Login failed for unknown email: {}", email);
            return Err(AccountError::InvalidCredentials);
        };

        if !verify_password_blocking(password, user.password_hash.clone()).await? {
            tracing::warn!("Login failed for {}: wrong password", email);
            return Err(AccountError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(user.id, &user.email)?;
        tracing::info!("User logged in: {}", user.email);
        Ok(SignedIn { user, access_token })
    }

    pub async fn current_user(&self, id: Uuid) -> Result<User, AccountError> {
        self.store.find_user(id).await?.ok_or(AccountError::UnknownUser)
    }
}

fn required(value: Option<String>, message: &'static str) -> Result<String, AccountError> {
    value.filter(|v| !v.is_empty()).ok_or(AccountError::Validation(message))
}
