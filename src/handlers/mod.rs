// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token required)
pub mod protected; // Tier 2: routed behind jwt_auth_middleware
pub mod public; // Tier 1: account creation and login
pub mod root; // Service info and health
