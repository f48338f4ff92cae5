//! Server configuration from environment variables.
//!
//! | Variable             | Default                      |
//! |----------------------|------------------------------|
//! | `DATABASE_URL`       | `postgres://localhost/noted` |
//! | `HOST`               | `0.0.0.0`                    |
//! | `PORT`               | `3000`                       |
//! | `APP_ENV`            | `development`                |
//! | `ALLOWED_ORIGINS`    | `http://localhost:3000`      |
//! | `BODY_LIMIT_BYTES`   | `102400`                     |
//! | `DB_MAX_CONNECTIONS` | `10`                         |
//!
//! Call `dotenvy::dotenv()` before [`ServerConfig::from_env`] to pick up a
//! local `.env` file.

use std::fmt;
use std::net::{AddrParseError, SocketAddr};
use std::str::FromStr;

use noted_core::defaults;
use noted_db::pool::DEFAULT_MAX_CONNECTIONS;
use tracing::warn;

/// Deployment environment, from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// Runtime configuration of the API server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    /// CORS origins; `*` allows any origin.
    pub allowed_origins: Vec<String>,
    /// Maximum accepted request body, in bytes.
    pub body_limit_bytes: usize,
    pub db_max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: defaults::DATABASE_URL.to_string(),
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            environment: Environment::default(),
            allowed_origins: parse_origin_list(defaults::ALLOWED_ORIGINS),
            body_limit_bytes: defaults::BODY_LIMIT_BYTES,
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Unparseable values fall back to their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = Self::default();
        let origins = lookup("ALLOWED_ORIGINS")
            .map(|raw| parse_origin_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or(base.allowed_origins);

        Self {
            database_url: lookup("DATABASE_URL").unwrap_or(base.database_url),
            host: lookup("HOST").unwrap_or(base.host),
            port: parsed_or(&lookup, "PORT", base.port),
            environment: parsed_or(&lookup, "APP_ENV", base.environment),
            allowed_origins: origins,
            body_limit_bytes: parsed_or(&lookup, "BODY_LIMIT_BYTES", base.body_limit_bytes),
            db_max_connections: parsed_or(&lookup, "DB_MAX_CONNECTIONS", base.db_max_connections),
        }
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parsed_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    subsystem = "api",
                    component = "config",
                    key = key,
                    value = %raw,
                    "Invalid configuration value, using default"
                );
                default
            }
        },
    }
}
