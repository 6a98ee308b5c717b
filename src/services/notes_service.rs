use std::sync::Arc;

use uuid::Uuid;

use crate::config::NotesConfig;
use crate::store::{NewNote, Note, NotePage, NotePatch, NoteQuery, PageRequest, SearchTerm, Store, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("Note not found")]
    NotFound,
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Fields accepted by edit-note before normalization.
#[derive(Debug, Clone, Default)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_pinned: Option<bool>,
}

impl NoteChanges {
    /// Empty title/content strings count as not supplied.
    fn into_patch(self) -> NotePatch {
        NotePatch {
            title: self.title.filter(|t| !t.is_empty()),
            content: self.content.filter(|c| !c.is_empty()),
            tags: self.tags,
            is_pinned: self.is_pinned,
        }
    }
}

/// One page of notes plus the numbers the client needs to render pagination.
#[derive(Debug, Clone)]
pub struct NoteListing {
    pub notes: Vec<Note>,
    pub total: i64,
    pub current_page: u32,
    pub total_pages: i64,
}

impl NoteListing {
    fn new(page: PageRequest, result: NotePage) -> Self {
        Self {
            total_pages: page.total_pages(result.total),
            current_page: page.page,
            total: result.total,
            notes: result.notes,
        }
    }
}

/// Owner-scoped note operations. Every call takes the caller's id and never
/// touches another user's notes.
#[derive(Clone)]
pub struct NotesService {
    store: Arc<dyn Store>,
    limits: NotesConfig,
}

impl NotesService {
    pub fn new(store: Arc<dyn Store>, limits: NotesConfig) -> Self {
        Self { store, limits }
    }

    pub async fn add(
        &self,
        owner: Uuid,
        title: Option<String>,
        content: Option<String>,
        tags: Option<Vec<String>>,
    ) -> Result<Note, NoteError> {
        let title = title.filter(|t| !t.is_empty()).ok_or(NoteError::Validation("Title is required"))?;
        let content = content
            .filter(|c| !c.is_empty())
            .ok_or(NoteError::Validation("Content is required"))?;

        let note = self
            .store
            .insert_note(
                owner,
                NewNote {
                    title,
                    content,
                    tags: tags.unwrap_or_default(),
                },
            )
            .await?;

        tracing::debug!("Note {} added for user {}", note.id, owner);
        Ok(note)
    }

    pub async fn edit(&self, owner: Uuid, note_id: &str, changes: NoteChanges) -> Result<Note, NoteError> {
        let patch = changes.into_patch();
        if patch.is_empty() {
            return Err(NoteError::Validation("No fields to update"));
        }
        self.apply(owner, note_id, patch).await
    }

    pub async fn set_pinned(&self, owner: Uuid, note_id: &str, is_pinned: Option<bool>) -> Result<Note, NoteError> {
        let is_pinned = is_pinned.ok_or(NoteError::Validation("isPinned is required"))?;
        self.apply(owner, note_id, NotePatch::pinned(is_pinned)).await
    }

    pub async fn delete(&self, owner: Uuid, note_id: &str) -> Result<(), NoteError> {
        let id = parse_note_id(note_id)?;
        if self.store.delete_note(owner, id).await? {
            tracing::debug!("Note {} deleted for user {}", id, owner);
            Ok(())
        } else {
            Err(NoteError::NotFound)
        }
    }

    pub async fn list(&self, owner: Uuid, page: Option<&str>, limit: Option<&str>) -> Result<NoteListing, NoteError> {
        let page = PageRequest::from_params(page, limit, self.limits.list_page_size, self.limits.max_limit);
        let result = self.store.list_notes(owner, NoteQuery { page, search: None }).await?;
        Ok(NoteListing::new(page, result))
    }

    /// Blank queries list everything, in the same order as `list`.
    pub async fn search(
        &self,
        owner: Uuid,
        query: Option<&str>,
        page: Option<&str>,
        limit: Option<&str>,
    ) -> Result<NoteListing, NoteError> {
        let page = PageRequest::from_params(page, limit, self.limits.search_page_size, self.limits.max_limit);
        let search = query.and_then(SearchTerm::parse);
        let result = self.store.list_notes(owner, NoteQuery { page, search }).await?;
        Ok(NoteListing::new(page, result))
    }

    async fn apply(&self, owner: Uuid, note_id: &str, patch: NotePatch) -> Result<Note, NoteError> {
        let id = parse_note_id(note_id)?;
        self.store
            .update_note(owner, id, patch)
            .await?
            .ok_or(NoteError::NotFound)
    }
}

/// An id that cannot name any note is reported as not found.
fn parse_note_id(raw: &str) -> Result<Uuid, NoteError> {
    Uuid::parse_str(raw).map_err(|_| NoteError::NotFound)
}
