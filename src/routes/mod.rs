use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{TokenIssuer, require_auth};
use crate::config::Config;

mod auth;
mod health;
mod index;
mod protected;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: Arc<TokenIssuer>,
    pub user_command: sesame_user::Command,
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let tokens = TokenIssuer::new(&config.jwt);

        Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            user_command: sesame_user::Command::new(pool.clone()),
            pool,
        }
    }
}

/// Credentialed CORS for the single configured frontend origin
pub fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(&config.cors.allowed_origin)?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}

pub fn router(app_state: AppState) -> anyhow::Result<Router> {
    let cors = cors_layer(&app_state.config)?;

    let protected_routes = Router::new()
        .route("/api/protected", get(protected::page))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Ok(Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .route("/", get(index::page))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}
