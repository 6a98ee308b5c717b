pub mod account_service;
pub mod notes_service;

pub use account_service::{AccountError, AccountService, SignedIn};
pub use notes_service::{NoteChanges, NoteError, NoteListing, NotesService};
