//! JWT token issuance and verification

use axum_extra::extract::CookieJar;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use super::TOKEN_COOKIE_NAME;
use crate::config::JwtConfig;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

/// Identity recovered from a verified token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

/// Why a request was not authenticated.
///
/// Expired, tampered and malformed tokens are all `InvalidCredential`:
/// the client only needs to know it must log in again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingCredential,
    InvalidCredential,
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::MissingCredential => "Token not provided",
            Rejection::InvalidCredential => "Invalid or expired token",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Authenticated(Principal),
    Rejected(Rejection),
}

/// Signs and verifies session tokens with the server-held HMAC secret.
///
/// Built once at startup from configuration and never mutated.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        let seconds =
            i64::try_from(config.expiration_hours.saturating_mul(3600)).unwrap_or(i64::MAX);
        Self::from_secret(config.secret.as_bytes(), Duration::seconds(seconds))
    }

    pub fn from_secret(secret: &[u8], lifetime: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            lifetime,
        }
    }

    pub fn issue(&self, principal: &Principal) -> anyhow::Result<IssuedToken> {
        self.issue_at(principal, OffsetDateTime::now_utc())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(
        &self,
        principal: &Principal,
        now: OffsetDateTime,
    ) -> anyhow::Result<IssuedToken> {
        let expires_at = now
            .checked_add(self.lifetime)
            .ok_or_else(|| anyhow::anyhow!("token expiry is out of range"))?;
        let claims = Claims {
            sub: principal.id.clone(),
            email: principal.email.clone(),
            name: principal.name.clone(),
            iat: now.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a raw token. An absent or empty token is a missing credential.
    pub fn verify(&self, token: Option<&str>) -> Verification {
        let Some(token) = token.filter(|token| !token.is_empty()) else {
            return Verification::Rejected(Rejection::MissingCredential);
        };

        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => Verification::Authenticated(data.claims.into()),
            Err(e) => {
                tracing::debug!(error = %e, "token rejected");
                Verification::Rejected(Rejection::InvalidCredential)
            }
        }
    }

    /// Verify the token carried by the session cookie
    pub fn verify_jar(&self, jar: &CookieJar) -> Verification {
        self.verify(jar.get(TOKEN_COOKIE_NAME).map(|cookie| cookie.value()))
    }
}
