//! Setcard Server Library
//!
//! REST backend for model setcards with username/password accounts and
//! signed bearer tokens. Exported for the binary and for integration tests.

pub mod auth;
pub mod clock;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use db::{open_database, Db};
pub use error::{AppError, Result};

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Config,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create a new AppState on the wall clock
    pub fn new(db: Db, config: Config) -> Self {
        Self::with_clock(db, config, Arc::new(SystemClock))
    }

    pub fn with_clock(db: Db, config: Config, clock: Arc<dyn Clock>) -> Self {
        Self { db, config, clock }
    }
}

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let protected = axum::middleware::from_fn_with_state(state.clone(), middleware::require_token);

    let router = Router::new()
        .route("/health", get(routes::health_check))
        .route("/api/test", get(routes::api_test))
        .route(
            "/api/setcards",
            get(routes::list_setcards)
                .merge(post(routes::create_setcard).route_layer(protected)),
        )
        .route("/api/register", post(routes::register_user))
        .route("/api/login", post(routes::login_user))
        .route("/api/validateToken", post(routes::validate_token))
        .route("/api/guestnode", post(routes::guest_token))
        .route("/guestnode", post(routes::guest_token))
        .nest_service("/models", ServeDir::new(&config.models_dir))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors_layer(&config))
        .with_state(state);

    if config.log_requests {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = if config.allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
