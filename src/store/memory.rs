use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::query::listing_order;
use super::{NewNote, NewUser, Note, NotePage, NotePatch, NoteQuery, Store, StoreError, StoreResult, User};

/// Process-local store used by tests and `NOTES_STORE=memory`.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    notes: RwLock<HashMap<Uuid, Note>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail(user.email));
        }

        let record = User {
            id: Uuid::new_v4(),
            full_name: user.full_name,
            email: user.email,
            password_hash: user.password_hash,
            created_on: Utc::now(),
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert_note(&self, owner: Uuid, note: NewNote) -> StoreResult<Note> {
        let record = Note {
            id: Uuid::new_v4(),
            title: note.title,
            content: note.content,
            tags: note.tags,
            is_pinned: false,
            user_id: owner,
            created_on: Utc::now(),
        };
        self.notes.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_note(&self, owner: Uuid, id: Uuid, patch: NotePatch) -> StoreResult<Option<Note>> {
        let mut notes = self.notes.write().await;
        match notes.get_mut(&id) {
            Some(note) if note.user_id == owner => {
                patch.apply(note);
                Ok(Some(note.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_note(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut notes = self.notes.write().await;
        match notes.get(&id) {
            Some(note) if note.user_id == owner => Ok(notes.remove(&id).is_some()),
            _ => Ok(false),
        }
    }

    async fn list_notes(&self, owner: Uuid, query: NoteQuery) -> StoreResult<NotePage> {
        let notes = self.notes.read().await;
        let mut matching: Vec<Note> = notes
            .values()
            .filter(|n| n.user_id == owner)
            .filter(|n| query.search.as_ref().map_or(true, |term| term.matches(n)))
            .cloned()
            .collect();
        matching.sort_by(listing_order);

        Ok(NotePage {
            total: matching.len() as i64,
            notes: query.page.window(&matching),
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{PageRequest, SearchTerm};

    fn new_note(title: &str) -> NewNote {
        NewNote {
            title: title.into(),
            content: "body".into(),
            tags: vec![],
        }
    }

    fn all(limit: u32) -> NoteQuery {
        NoteQuery {
            page: PageRequest { page: 1, limit },
            search: None,
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let store = MemoryStore::new();
        let user = NewUser {
            full_name: "A".into(),
            email: "a@example.com".into(),
            password_hash: "hash".into(),
        };
        store.insert_user(user.clone()).await.unwrap();
        assert!(matches!(
            store.insert_user(user).await,
            Err(StoreError::DuplicateEmail(_))
        ));
    }

    #[tokio::test]
    async fn notes_are_scoped_to_owner() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let note = store.insert_note(alice, new_note("mine")).await.unwrap();

        assert!(store.update_note(bob, note.id, NotePatch::pinned(true)).await.unwrap().is_none());
        assert!(!store.delete_note(bob, note.id).await.unwrap());
        assert_eq!(store.list_notes(bob, all(9)).await.unwrap().total, 0);

        let page = store.list_notes(alice, all(9)).await.unwrap();
        assert_eq!(page.total, 1);
        assert!(!page.notes[0].is_pinned);
    }

    #[tokio::test]
    async fn delete_is_reported_once() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let note = store.insert_note(owner, new_note("gone")).await.unwrap();
        assert!(store.delete_note(owner, note.id).await.unwrap());
        assert!(!store.delete_note(owner, note.id).await.unwrap());
    }

    #[tokio::test]
    async fn list_windows_and_counts_search_results() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        for i in 0..5 {
            store.insert_note(owner, new_note(&format!("gym {i}"))).await.unwrap();
        }
        store.insert_note(owner, new_note("groceries")).await.unwrap();

        let page = store
            .list_notes(
                owner,
                NoteQuery {
                    page: PageRequest { page: 2, limit: 3 },
                    search: SearchTerm::parse("GYM"),
                },
            )
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.notes.len(), 2);
        assert!(page.notes.iter().all(|n| n.title.starts_with("gym")));
    }
}
