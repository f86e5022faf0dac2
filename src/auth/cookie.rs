//! Session cookie construction

use axum_extra::extract::cookie::Cookie;
use time::{Duration, OffsetDateTime};

use super::{IssuedToken, TOKEN_COOKIE_NAME};
use crate::config::CookieConfig;

/// Cookie carrying a freshly issued token. It expires together with the token.
pub fn session_cookie(issued: &IssuedToken, config: &CookieConfig) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE_NAME, issued.token.clone()))
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(config.same_site.into())
        .expires(issued.expires_at)
        .build()
}

/// Empty, already expired cookie that overwrites the session cookie
pub fn expired_session_cookie(config: &CookieConfig) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(config.same_site.into())
        .max_age(Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}
