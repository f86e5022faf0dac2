use axum::{Router, body::Body, http::Response};
use http_body_util::BodyExt;
use serde_json::Value;
use sesame::{
    AppState, Config,
    auth::{IssuedToken, Principal},
    config::{
        CookieConfig, CorsConfig, DatabaseConfig, JwtConfig, ObservabilityConfig, ServerConfig,
    },
};
use sqlx::SqlitePool;

#[allow(dead_code)]
pub const TEST_SECRET: &str = "test_secret_key_minimum_32_characters_long";
#[allow(dead_code)]
pub const TEST_ORIGIN: &str = "http://localhost:5173";

pub fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            expiration_hours: 24,
        },
        cors: CorsConfig {
            allowed_origin: TEST_ORIGIN.to_string(),
        },
        cookie: CookieConfig::default(),
        observability: ObservabilityConfig::default(),
    }
}

pub async fn setup_test_pool() -> SqlitePool {
    let pool = sesame::create_pool("sqlite::memory:", 1)
        .await
        .expect("Failed to create test database");
    sesame_user::migrate(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub async fn create_test_app() -> (Router, AppState) {
    let pool = setup_test_pool().await;
    let state = AppState::new(test_config(), pool);
    let router = sesame::router(state.clone()).expect("Failed to build router");

    (router, state)
}

#[allow(dead_code)]
pub async fn create_user(state: &AppState, email: &str, password: &str) -> sesame_user::User {
    state
        .user_command
        .register(sesame_user::RegisterInput {
            email: email.to_string(),
            password: password.to_string(),
            name: None,
        })
        .await
        .expect("Failed to create user")
}

#[allow(dead_code)]
pub fn session_token(state: &AppState, user: &sesame_user::User) -> IssuedToken {
    state
        .tokens
        .issue(&Principal {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
        })
        .expect("Failed to issue token")
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

#[allow(dead_code)]
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect()
}
