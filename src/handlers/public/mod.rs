// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition endpoints. Every input is untrusted here; validation
// happens in AccountService.

pub mod create_account; // POST /create-account
pub mod login; // POST /login

pub use create_account::create_account;
pub use login::login;
