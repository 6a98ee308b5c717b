// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Routed behind jwt_auth_middleware, so every handler can extract the
// caller as `Extension<AuthUser>`. Note handlers pass the caller id down to
// NotesService, which scopes every store call to that owner.

pub mod get_user; // GET /get-user
pub mod notes; // /add-note, /edit-note, /get-all-notes, ...

pub use get_user::get_user;
