//! API configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). Database connection parts use the `DB_*` names; a full
//! `DATABASE_URL` takes precedence when set.

use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::Context;
use sqlx::postgres::PgConnectOptions;

/// Environment name in which error details are shown by default.
pub const LOCAL_ENVIRONMENT: &str = "local";

/// Which storage backend the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceBackend {
    /// PostgreSQL through `sqlx`.
    Postgres,
    /// Process-local maps. Data is lost on restart.
    Memory,
}

impl FromStr for PersistenceBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => anyhow::bail!("unknown persistence backend `{other}`"),
        }
    }
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unknown log format `{other}`"),
        }
    }
}

/// Connection pool settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Where and how to connect.
    pub connect_options: PgConnectOptions,
    /// Maximum number of database connections in the pool.
    pub max_connections: u32,
    /// Minimum idle connections in the pool.
    pub min_connections: u32,
    /// Timeout in seconds for acquiring a database connection.
    pub connect_timeout_secs: u64,
}

/// Top-level API configuration.
///
/// Loaded once at startup via [`ApiConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,
    /// Deployment environment name (`local`, `staging`, ...).
    pub environment: String,
    /// Whether error responses include the underlying error text.
    pub show_error_details: bool,
    /// Storage backend selection.
    pub persistence_backend: PersistenceBackend,
    /// Database settings, used by the PostgreSQL backend.
    pub database: DatabaseConfig,
    /// Log output format.
    pub log_format: LogFormat,
}

impl ApiConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file, then
    /// falls back to defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR`, `DATABASE_URL`,
    /// `PERSISTENCE_BACKEND` or `LOG_FORMAT` is set to an unparsable value.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = env_or("LISTEN_ADDR", "0.0.0.0:8000")
            .parse()
            .context("LISTEN_ADDR must be a socket address such as 0.0.0.0:8000")?;

        let environment = env_or("ENVIRONMENT", LOCAL_ENVIRONMENT);
        let show_error_details = resolve_show_error_details(
            &environment,
            std::env::var("SHOW_ERROR_DETAILS").ok().as_deref(),
        );

        let persistence_backend = env_or("PERSISTENCE_BACKEND", "postgres")
            .parse()
            .context("invalid PERSISTENCE_BACKEND")?;

        let log_format = env_or("LOG_FORMAT", "text")
            .parse()
            .context("invalid LOG_FORMAT")?;

        let connect_options = match std::env::var("DATABASE_URL") {
            Ok(url) => PgConnectOptions::from_str(&url).context("invalid DATABASE_URL")?,
            Err(_) => PgConnectOptions::new()
                .host(&env_or("DB_HOST", "localhost"))
                .port(parse_env("DB_PORT", 5432))
                .database(&env_or("DB_NAME", "postgres"))
                .username(&env_or("DB_USER", "postgres"))
                .password(&env_or("DB_PASS", "")),
        };

        let database = DatabaseConfig {
            connect_options,
            max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10),
            min_connections: parse_env("DATABASE_MIN_CONNECTIONS", 2),
            connect_timeout_secs: parse_env("DATABASE_CONNECT_TIMEOUT_SECS", 5),
        };

        Ok(Self {
            listen_addr,
            environment,
            show_error_details,
            persistence_backend,
            database,
            log_format,
        })
    }
}

/// Decides whether error details are exposed.
///
/// An explicit, parsable `SHOW_ERROR_DETAILS` wins; otherwise details are
/// shown only in the local environment.
#[must_use]
pub fn resolve_show_error_details(environment: &str, explicit: Option<&str>) -> bool {
    explicit
        .and_then(parse_bool)
        .unwrap_or(environment == LOCAL_ENVIRONMENT)
}

/// Parses a boolean flag. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive).
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
