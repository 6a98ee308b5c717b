use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{AuthError, TokenKeys};
use crate::config::AppConfig;
use crate::handlers::{protected, public, root};
use crate::middleware::jwt_auth_middleware;
use crate::services::{AccountService, NotesService};
use crate::store::Store;

/// Shared handles injected into every handler. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenKeys,
    pub accounts: AccountService,
    pub notes: NotesService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Result<Self, AuthError> {
        let tokens = TokenKeys::from_config(&config.security)?;
        Ok(Self {
            accounts: AccountService::new(store.clone(), tokens.clone()),
            notes: NotesService::new(store.clone(), config.notes.clone()),
            store,
            tokens,
            config: Arc::new(config),
        })
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Public
        .route("/", get(root::root))
        .route("/health", get(root::health))
        .merge(public_routes())
        // Protected
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/create-account", post(public::create_account))
        .route("/login", post(public::login))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/get-user", get(protected::get_user))
        .route("/add-note", post(protected::notes::add_note))
        .route("/edit-note/:note_id", put(protected::notes::edit_note))
        .route("/get-all-notes", get(protected::notes::get_all_notes))
        .route("/delete-note/:note_id", delete(protected::notes::delete_note))
        .route("/update-pin-status/:note_id", put(protected::notes::update_pin_status))
        .route("/search-notes", get(protected::notes::search_notes))
        // The web client requests `/search-notes/?query=...`
        .route("/search-notes/", get(protected::notes::search_notes))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    // Wildcard cannot be combined with credentials or an explicit list
    if config.security.cors_origins.iter().any(|origin| origin == "*") {
        tracing::warn!("CORS allows any origin; credentials disabled");
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(origins).allow_credentials(true)
}
