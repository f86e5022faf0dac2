use axum_extra::extract::cookie::SameSite;
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Minimum accepted length of the signing secret
pub const MIN_SECRET_LEN: usize = 32;
/// One year
pub const MAX_EXPIRATION_HOURS: u64 = 8760;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_environment")]
    pub environment: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    #[serde(default)]
    pub cookie: CookieConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

fn default_environment() -> String {
    "development".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// HMAC signing secret. Has no default: a missing secret fails startup.
    pub secret: String,
    pub expiration_hours: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Single origin allowed to make credentialed cross-origin requests
    pub allowed_origin: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    Strict,
    #[default]
    Lax,
    None,
}

impl From<SameSitePolicy> for SameSite {
    fn from(policy: SameSitePolicy) -> Self {
        match policy {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::None => SameSite::None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CookieConfig {
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub same_site: SameSitePolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy environment variables (JWT_SECRET, FRONTEND_URL, PORT, DATABASE_URL)
    /// 2. Prefixed environment variables (SESAME__JWT__SECRET, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite:sesame.db?mode=rwc")?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.expiration_hours", 24)?
            .set_default("cors.allowed_origin", "http://localhost:5173")?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // The config file is optional
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("SESAME")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(environment) = env::var("ENVIRONMENT") {
            builder = builder.set_override("environment", environment)?;
        }
        if let Ok(jwt_secret) = env::var("JWT_SECRET") {
            builder = builder.set_override("jwt.secret", jwt_secret)?;
        }
        if let Ok(frontend_url) = env::var("FRONTEND_URL") {
            builder = builder.set_override("cors.allowed_origin", frontend_url)?;
        }
        if let Ok(port) = env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }
        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Validate configuration. Any error here is fatal at startup.
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.trim().is_empty() {
            return Err("JWT secret is not configured".to_string());
        }
        if self.jwt.secret.len() < MIN_SECRET_LEN {
            return Err(format!(
                "JWT secret must be at least {MIN_SECRET_LEN} characters long"
            ));
        }
        if self.jwt.expiration_hours == 0 {
            return Err("JWT expiration_hours must be at least 1".to_string());
        }
        if self.jwt.expiration_hours > MAX_EXPIRATION_HOURS {
            return Err(format!(
                "JWT expiration_hours must be at most {MAX_EXPIRATION_HOURS}"
            ));
        }
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.cors.allowed_origin.trim().is_empty() || self.cors.allowed_origin == "*" {
            return Err("CORS allowed_origin must name a single origin".to_string());
        }
        if self.cookie.same_site == SameSitePolicy::None && !self.cookie.secure {
            return Err("cookie.same_site = none requires cookie.secure = true".to_string());
        }
        if self.is_production() && !self.cookie.secure {
            return Err("cookie.secure must be enabled in production".to_string());
        }
        Ok(())
    }
}
