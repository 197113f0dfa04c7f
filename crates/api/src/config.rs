//! Server configuration loaded once at process start.

use std::net::SocketAddr;

use thiserror::Error;

use storefront_auth::AuthConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is not a valid number: '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} is not a valid socket address: '{value}'")]
    InvalidAddr { key: &'static str, value: String },

    #[error("ADMIN_EMAIL and ADMIN_PASSWORD must be set together")]
    IncompleteAdmin,

    #[error(transparent)]
    Auth(#[from] storefront_auth::ConfigError),
}

/// Administrator account seeded into an empty directory at startup.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub auth: AuthConfig,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Read `JWT_SECRET`, `JWT_EXPIRATION`, `BIND_ADDR`, `ADMIN_EMAIL` and
    /// `ADMIN_PASSWORD` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let ttl = match lookup("JWT_EXPIRATION") {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| ConfigError::InvalidNumber {
                key: "JWT_EXPIRATION",
                value: raw,
            })?,
            None => DEFAULT_TOKEN_TTL_SECS,
        };

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::InvalidAddr {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let bootstrap_admin = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteAdmin),
        };

        Ok(Self {
            bind_addr,
            auth: AuthConfig::new(secret, ttl)?,
            bootstrap_admin,
        })
    }
}
