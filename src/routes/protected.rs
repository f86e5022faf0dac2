use axum::{Extension, Json};
use serde_json::{Value, json};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::auth::Principal;
use crate::error::AppError;

/// GET /api/protected - Example resource behind `require_auth`
pub async fn page(Extension(principal): Extension<Principal>) -> Result<Json<Value>, AppError> {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok(Json(json!({
        "message": "Access granted to protected content",
        "user": principal,
        "timestamp": timestamp,
    })))
}
