//! Process configuration for the page service, read once at startup.

use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Settings of the HTTP server and its page store.
///
/// | Env Var                | Default                    |
/// |------------------------|----------------------------|
/// | `DATABASE_URL`         | required                   |
/// | `HOST`                 | `0.0.0.0`                  |
/// | `PORT`                 | `3000`                     |
/// | `CORS_ORIGINS`         | `http://localhost:5173`    |
/// | `REQUEST_TIMEOUT_SECS` | `30`                       |
/// | `DB_MAX_CONNECTIONS`   | `20`                       |
///
/// Token settings are described on [`JwtConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Editor front-ends allowed to call the API.
    pub cors_origins: Vec<String>,
    /// Deadline for a whole request. Page mutations, their link
    /// recomputation and their search index writes all run inside it; a
    /// request that overruns is dropped and its transaction rolls back.
    pub request_timeout_secs: u64,
    /// Upper bound on concurrently open request transactions.
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from the environment.
    ///
    /// # Panics
    ///
    /// Panics if `DATABASE_URL` is unset or a numeric setting does not parse.
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            database_url,
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 20),
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Parse `key` from the environment, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}
