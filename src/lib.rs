pub mod access;
pub mod api;
pub mod appresult;
pub mod auth;
pub mod config;
pub mod identity;
pub mod index;
pub mod profiles;
pub mod res;
pub mod rooms;
pub mod session;
pub mod sports;
pub mod store;

use axum::{extract::FromRef, routing::get, Router};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

pub use appresult::{AppError, AppResult};
pub use config::Config;

use identity::{Identity, Tokens};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub identity: Identity,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, config: &Config) -> Self {
        let tokens = Tokens::new(
            &config.jwt_secret,
            config.access_token_ttl_secs,
            config.refresh_token_ttl_secs,
        );
        Self {
            db_pool,
            identity: Identity::new(tokens, config.bcrypt_cost),
        }
    }
}

/// Both surfaces on one router: pages at the root, JSON under `/api`.
pub fn app(app_state: AppState, config: &Config) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(config.session_inactivity_mins)));

    Router::new()
        .route("/style.css", get(res::stylesheet))
        .merge(index::router())
        .merge(auth::router())
        .merge(rooms::router())
        .merge(profiles::router())
        .merge(sports::router())
        .nest("/api", api::router().layer(CorsLayer::permissive()))
        .with_state(app_state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}
