//! Authentication middleware for Axum

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde_json::json;
use tracing::{debug, warn};

use super::jwt::{Rejection, Verification};
use crate::routes::AppState;

impl Rejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Rejection::MissingCredential => StatusCode::UNAUTHORIZED,
            Rejection::InvalidCredential => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Verifies the session cookie and inserts the `Principal` into request
/// extensions. Missing cookie answers 401, any invalid token answers 403.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match state.tokens.verify_jar(&jar) {
        Verification::Authenticated(principal) => {
            debug!(user_id = %principal.id, "request authenticated");
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Verification::Rejected(rejection) => {
            warn!(
                path = %request.uri().path(),
                reason = rejection.message(),
                "request rejected"
            );
            rejection.into_response()
        }
    }
}
