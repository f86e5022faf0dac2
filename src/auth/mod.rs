//! Authentication module
//!
//! Provides JWT-based authentication with HTTP-only cookies

pub mod cookie;
pub mod jwt;
pub mod middleware;

pub use cookie::{expired_session_cookie, session_cookie};
pub use jwt::{Claims, IssuedToken, Principal, Rejection, TokenIssuer, Verification};
pub use middleware::require_auth;

/// Cookie name for JWT token
pub const TOKEN_COOKIE_NAME: &str = "token";
