//! Session client for the cookie-authenticated API
//!
//! The session cookie is kept by the HTTP client's cookie store and is never
//! exposed to callers. What callers see is a cached, non-sensitive `User`
//! that drives synchronous "is someone logged in" checks.

mod cache;
mod error;
mod navigator;
mod session;

pub use cache::{FileCache, MemoryCache, SessionCache};
pub use error::{CacheError, ClientError};
pub use navigator::{LogNavigator, Navigator};
pub use session::{AuthResponse, SessionClient, USER_CACHE_KEY, User};

pub use reqwest::{Method, StatusCode};
