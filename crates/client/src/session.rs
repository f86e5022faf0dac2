use std::sync::Arc;

use reqwest::{Method, Response, StatusCode, Url, header};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cache::SessionCache;
use crate::error::ClientError;
use crate::navigator::Navigator;

/// Cache key holding the serialized user
pub const USER_CACHE_KEY: &str = "user";

const AUTH_PATH: &str = "/api/auth";

/// Non-sensitive projection of the authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
}

#[derive(Deserialize)]
struct ProfileResponse {
    user: User,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// HTTP client that carries the session cookie on every request and
/// mirrors the logged-in user into a local cache.
///
/// The token itself lives in the cookie store and is never read here.
#[derive(Clone)]
pub struct SessionClient {
    base: Url,
    http: reqwest::Client,
    cache: Arc<dyn SessionCache>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl SessionClient {
    pub fn new(
        base: &str,
        cache: Arc<dyn SessionCache>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let base = Url::parse(base)?;
        let http = reqwest::Client::builder().cookie_store(true).build()?;

        Ok(Self {
            base,
            http,
            cache,
            navigator,
            login_path: "/login".to_owned(),
        })
    }

    /// Where `fetch_with_auth` sends the user after a 401
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AuthResponse, ClientError> {
        let body = json!({ "email": email, "password": password, "name": name });
        self.authenticate("register", body, "Failed to register user")
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = json!({ "email": email, "password": password });
        self.authenticate("login", body, "Failed to log in").await
    }

    async fn authenticate(
        &self,
        action: &str,
        body: serde_json::Value,
        fallback: &str,
    ) -> Result<AuthResponse, ClientError> {
        let url = self.url(&format!("{AUTH_PATH}/{action}"))?;
        let resp = self.http.post(url).json(&body).send().await?;

        if !resp.status().is_success() {
            return Err(server_error(resp, fallback).await);
        }

        let data: AuthResponse = resp.json().await?;
        self.cache
            .set(USER_CACHE_KEY, serde_json::to_string(&data.user)?)?;

        tracing::debug!(user_id = %data.user.id, action, "session established");

        Ok(data)
    }

    /// Forget the cached user. The cookie is left alone; see `sign_out`.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.cache.remove(USER_CACHE_KEY)?;
        Ok(())
    }

    /// Ask the server to expire the cookie, then forget the cached user
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        let url = self.url(&format!("{AUTH_PATH}/logout"))?;
        let result = self.http.post(url).send().await;
        self.logout()?;

        let resp = result?;
        if !resp.status().is_success() {
            return Err(server_error(resp, "Failed to log out").await);
        }

        Ok(())
    }

    /// Cached user, without contacting the server. May be stale.
    pub fn current_user(&self) -> Option<User> {
        let raw = self.cache.get(USER_CACHE_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed cached user");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.cache.get(USER_CACHE_KEY).is_some()
    }

    /// Fetch the user behind the current cookie from the server
    pub async fn profile(&self) -> Result<User, ClientError> {
        let url = self.url(&format!("{AUTH_PATH}/me"))?;
        let resp = self.http.get(url).send().await?;

        if !resp.status().is_success() {
            return Err(server_error(resp, "Failed to fetch profile").await);
        }

        let data: ProfileResponse = resp.json().await?;
        Ok(data.user)
    }

    /// Credentialed request. A 401 ends the local session: the cache is
    /// cleared (best effort), the navigator is sent to the login page and the
    /// call fails with `SessionExpired`. Every other status is handed back
    /// untouched.
    pub async fn fetch_with_auth(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response, ClientError> {
        let url = self.url(path)?;
        let mut request = self
            .http
            .request(method, url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let resp = request.send().await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            if let Err(e) = self.logout() {
                tracing::warn!(error = %e, "failed to clear cached user after 401");
            }
            self.navigator.redirect_to_login(&self.login_path);
            return Err(ClientError::SessionExpired);
        }

        Ok(resp)
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }
}

async fn server_error(resp: Response, fallback: &str) -> ClientError {
    let status = resp.status();
    let message = resp
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| fallback.to_owned());

    ClientError::Server { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::navigator::LogNavigator;

    fn client(cache: Arc<MemoryCache>) -> SessionClient {
        SessionClient::new("http://127.0.0.1:1", cache, Arc::new(LogNavigator)).unwrap()
    }

    #[test]
    fn test_current_user_reads_cache() {
        let cache = Arc::new(MemoryCache::new());
        let client = client(cache.clone());
        assert_eq!(client.current_user(), None);
        assert!(!client.is_authenticated());

        cache
            .set(
                USER_CACHE_KEY,
                r#"{"id":"01J","email":"a@x.com","name":null}"#.to_owned(),
            )
            .unwrap();

        let user = client.current_user().unwrap();
        assert_eq!(user.email, "a@x.com");
        assert!(client.is_authenticated());
    }

    #[test]
    fn test_malformed_cached_user_reads_as_none() {
        let cache = Arc::new(MemoryCache::new());
        cache.set(USER_CACHE_KEY, "{oops".to_owned()).unwrap();

        assert_eq!(client(cache).current_user(), None);
    }

    #[test]
    fn test_logout_is_idempotent() {
        let cache = Arc::new(MemoryCache::new());
        cache
            .set(USER_CACHE_KEY, r#"{"id":"01J","email":"a@x.com"}"#.to_owned())
            .unwrap();
        let client = client(cache.clone());

        client.logout().unwrap();
        assert_eq!(cache.get(USER_CACHE_KEY), None);

        client.logout().unwrap();
        assert_eq!(cache.get(USER_CACHE_KEY), None);
    }

    #[test]
    fn test_invalid_base_url() {
        let result = SessionClient::new(
            "not a url",
            Arc::new(MemoryCache::new()),
            Arc::new(LogNavigator),
        );
        assert!(matches!(result, Err(ClientError::Url(_))));
    }
}
