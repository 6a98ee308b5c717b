use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;
use uuid::Uuid;

use super::{NewNote, NewUser, Note, NotePage, NotePatch, NoteQuery, Store, StoreError, StoreResult, User};
use crate::config::DatabaseConfig;

const USER_COLUMNS: &str = "id, full_name, email, password_hash, created_on";
const NOTE_COLUMNS: &str = "id, title, content, tags, is_pinned, user_id, created_on";

/// Owner filter plus optional literal search. `$1` is the owner, `$2` the
/// escaped LIKE pattern or NULL for no search.
const NOTE_FILTER: &str = r#"
    user_id = $1
    AND (
        $2::text IS NULL
        OR title ILIKE $2 ESCAPE '\'
        OR content ILIKE $2 ESCAPE '\'
        OR EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE $2 ESCAPE '\')
    )
"#;

/// PostgreSQL-backed store. One pool per process, created at startup.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Connected to database: {}", redact_url(url));
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

/// Strips the password from a connection string before it is logged.
fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("****"));
            }
            url.into()
        }
        Err(_) => "<invalid url>".to_string(),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (id, full_name, email, password_hash) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.full_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    StoreError::DuplicateEmail(user.email.clone())
                }
                other => StoreError::Sqlx(other),
            })
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn insert_note(&self, owner: Uuid, note: NewNote) -> StoreResult<Note> {
        let sql = format!(
            "INSERT INTO notes (id, title, content, tags, user_id) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            NOTE_COLUMNS
        );
        let note = sqlx::query_as::<_, Note>(&sql)
            .bind(Uuid::new_v4())
            .bind(&note.title)
            .bind(&note.content)
            .bind(&note.tags)
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;
        Ok(note)
    }

    async fn update_note(&self, owner: Uuid, id: Uuid, patch: NotePatch) -> StoreResult<Option<Note>> {
        let sql = format!(
            r#"UPDATE notes SET
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                tags = COALESCE($5, tags),
                is_pinned = COALESCE($6, is_pinned)
            WHERE id = $1 AND user_id = $2
            RETURNING {}"#,
            NOTE_COLUMNS
        );
        let note = sqlx::query_as::<_, Note>(&sql)
            .bind(id)
            .bind(owner)
            .bind(patch.title)
            .bind(patch.content)
            .bind(patch.tags)
            .bind(patch.is_pinned)
            .fetch_optional(&self.pool)
            .await?;
        Ok(note)
    }

    async fn delete_note(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_notes(&self, owner: Uuid, query: NoteQuery) -> StoreResult<NotePage> {
        let pattern = query.search.as_ref().map(|term| term.like_pattern());

        let count_sql = format!("SELECT COUNT(*) FROM notes WHERE {}", NOTE_FILTER);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(owner)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        let select_sql = format!(
            "SELECT {} FROM notes WHERE {} ORDER BY is_pinned DESC, created_on DESC, id DESC LIMIT $3 OFFSET $4",
            NOTE_COLUMNS, NOTE_FILTER
        );
        let notes = sqlx::query_as::<_, Note>(&select_sql)
            .bind(owner)
            .bind(&pattern)
            .bind(i64::from(query.page.limit))
            .bind(query.page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(NotePage { notes, total })
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
