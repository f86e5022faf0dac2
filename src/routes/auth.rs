//! Authentication route handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use serde_json::{Value, json};
use sesame_user::{LoginInput, RegisterInput, User};
use tracing::{info, warn};

use super::AppState;
use crate::auth::{Principal, Verification, expired_session_cookie, session_cookie};
use crate::error::AppError;

#[derive(Serialize)]
pub struct AuthResponse {
    message: &'static str,
    user: User,
}

/// Sign a token for `user` and attach it to the jar as the session cookie
fn start_session(state: &AppState, jar: CookieJar, user: &User) -> Result<CookieJar, AppError> {
    let principal = Principal {
        id: user.id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
    };
    let issued = state.tokens.issue(&principal)?;

    Ok(jar.add(session_cookie(&issued, &state.config.cookie)))
}

fn bad_payload(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}

/// POST /api/auth/register - Create an account and open a session
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    let Json(input) = payload.map_err(bad_payload)?;

    let user = state.user_command.register(input).await?;
    let jar = start_session(&state, jar, &user)?;

    info!(user_id = %user.id, "User registered successfully");

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            message: "User registered successfully",
            user,
        }),
    ))
}

/// POST /api/auth/login - Check credentials and open a session
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let Json(input) = payload.map_err(bad_payload)?;

    let user = state.user_command.login(input).await?;
    let jar = start_session(&state, jar, &user)?;

    info!(user_id = %user.id, "User logged in successfully");

    Ok((
        jar,
        Json(AuthResponse {
            message: "Login successful",
            user,
        }),
    ))
}

/// POST /api/auth/logout - Overwrite the session cookie with an expired one
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    let jar = jar.add(expired_session_cookie(&state.config.cookie));

    (jar, Json(json!({ "message": "Logged out" })))
}

/// GET /api/auth/me - Current user behind the session cookie.
/// Every failure is a 401 so the client treats it as a lost session.
pub async fn me(State(state): State<AppState>, jar: CookieJar) -> Result<Json<Value>, AppError> {
    let principal = match state.tokens.verify_jar(&jar) {
        Verification::Authenticated(principal) => principal,
        Verification::Rejected(rejection) => {
            return Err(AppError::Unauthorized(rejection.message().to_string()));
        }
    };

    let Some(user) = state.user_command.find_by_id(&principal.id).await? else {
        warn!(user_id = %principal.id, "valid token for unknown user");
        return Err(AppError::Unauthorized("User not found".to_string()));
    };

    Ok(Json(json!({ "user": user })))
}
