use axum::Json;
use serde_json::{Value, json};

/// GET / - Describes the available endpoints
pub async fn page() -> Json<Value> {
    Json(json!({
        "message": "Authentication API",
        "endpoints": {
            "register": "POST /api/auth/register",
            "login": "POST /api/auth/login",
            "logout": "POST /api/auth/logout",
            "profile": "GET /api/auth/me (requires token)",
            "protected": "GET /api/protected (requires token)",
        }
    }))
}
