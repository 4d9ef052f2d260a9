//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_ACCESS_TOKEN_MINUTES, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_USERNAME,
    DEFAULT_DATABASE_URL, DEFAULT_REDIS_URL, DEFAULT_REFRESH_TOKEN_DAYS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Credentials for the bootstrap admin account.
#[derive(Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    password: Option<String>,
}

impl AdminBootstrap {
    /// Password for the bootstrap admin, if configured.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    jwt_secret: String,
    jwt_refresh_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    pub server_host: String,
    pub server_port: u16,
    pub admin: AdminBootstrap,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_refresh_secret", &"[REDACTED]")
            .field("access_token_minutes", &self.access_token_minutes)
            .field("refresh_token_days", &self.refresh_token_days)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("admin_username", &self.admin.username)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// # Errors
    /// Fails if a JWT secret is missing in a release build or shorter than
    /// the minimum length.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = secret_from_env("JWT_SECRET", "dev-access-secret-minimum-32-chars!!")?;
        let jwt_refresh_secret =
            secret_from_env("JWT_REFRESH_SECRET", "dev-refresh-secret-minimum-32-chars!")?;

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            jwt_secret,
            jwt_refresh_secret,
            access_token_minutes: parse_env("JWT_ACCESS_TTL_MINUTES")
                .unwrap_or(DEFAULT_ACCESS_TOKEN_MINUTES),
            refresh_token_days: parse_env("JWT_REFRESH_TTL_DAYS")
                .unwrap_or(DEFAULT_REFRESH_TOKEN_DAYS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_env("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
            admin: AdminBootstrap {
                username: env::var("ADMIN_USERNAME")
                    .unwrap_or_else(|_| DEFAULT_ADMIN_USERNAME.to_string()),
                email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string()),
                password: env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
            },
        })
    }

    /// Build a configuration with explicit secrets (tests, embedding).
    pub fn with_secrets(access_secret: &str, refresh_secret: &str) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            jwt_secret: access_secret.to_string(),
            jwt_refresh_secret: refresh_secret.to_string(),
            access_token_minutes: DEFAULT_ACCESS_TOKEN_MINUTES,
            refresh_token_days: DEFAULT_REFRESH_TOKEN_DAYS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            admin: AdminBootstrap {
                username: DEFAULT_ADMIN_USERNAME.to_string(),
                email: DEFAULT_ADMIN_EMAIL.to_string(),
                password: None,
            },
        }
    }

    /// Set the bootstrap admin password.
    pub fn with_admin_password(mut self, password: impl Into<String>) -> Self {
        self.admin.password = Some(password.into());
        self
    }

    /// Secret bytes for signing/verifying access tokens.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Secret bytes for signing/verifying refresh tokens.
    pub fn jwt_refresh_secret_bytes(&self) -> &[u8] {
        self.jwt_refresh_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn secret_from_env(key: &str, dev_default: &str) -> AppResult<String> {
    let secret = match env::var(key) {
        Ok(secret) => secret,
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("{} not set, using insecure default for development", key);
            dev_default.to_string()
        }
        Err(_) => {
            return Err(AppError::internal(format!(
                "{} environment variable must be set in production",
                key
            )))
        }
    };

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        return Err(AppError::internal(format!(
            "{} must be at least {} characters long",
            key, MIN_JWT_SECRET_LENGTH
        )));
    }

    Ok(secret)
}
