pub mod memory;
pub mod models;
pub mod postgres;
pub mod query;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use models::{NewNote, NewUser, Note, NotePatch, User};
pub use postgres::PgStore;
pub use query::{NotePage, NoteQuery, PageRequest, SearchTerm};

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for accounts and notes.
///
/// Every note method takes the owner id and must filter by `(note_id, owner)`;
/// a note belonging to someone else is reported exactly like a missing one.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn insert_note(&self, owner: Uuid, note: NewNote) -> StoreResult<Note>;

    /// Applies `patch` to the owner's note and returns the updated row.
    async fn update_note(&self, owner: Uuid, id: Uuid, patch: NotePatch) -> StoreResult<Option<Note>>;

    /// Returns whether a row was removed.
    async fn delete_note(&self, owner: Uuid, id: Uuid) -> StoreResult<bool>;

    async fn list_notes(&self, owner: Uuid, query: NoteQuery) -> StoreResult<NotePage>;

    async fn ping(&self) -> StoreResult<()>;
}
