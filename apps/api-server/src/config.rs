//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use blogicum_core::domain::DEFAULT_PER_PAGE;
use blogicum_infra::{DatabaseConfig, JwtConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the server on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub posts_per_page: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            config.max_connections = parse_var("DB_MAX_CONNECTIONS", config.max_connections);
            config.min_connections = parse_var("DB_MIN_CONNECTIONS", config.min_connections);
            config
        });

        let defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET").unwrap_or(defaults.secret),
            expiration_hours: parse_var("JWT_EXPIRATION_HOURS", defaults.expiration_hours),
            issuer: env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080),
            database,
            jwt,
            posts_per_page: parse_var("POSTS_PER_PAGE", DEFAULT_PER_PAGE).max(1),
        }
    }
}

/// Read and parse `key`, falling back to `default` when unset or malformed.
fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring malformed environment variable");
            default
        }),
        Err(_) => default,
    }
}
