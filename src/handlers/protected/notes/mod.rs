pub mod add_note;
pub mod delete_note;
pub mod edit_note;
pub mod get_all_notes;
pub mod search_notes;
pub mod update_pin_status;

pub use add_note::add_note;
pub use delete_note::delete_note;
pub use edit_note::edit_note;
pub use get_all_notes::get_all_notes;
pub use search_notes::search_notes;
pub use update_pin_status::update_pin_status;

use serde::Serialize;

use crate::store::Note;

/// `{ note }` payload shared by add/edit/pin.
#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub note: Note,
}
