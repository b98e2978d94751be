//! Environment-driven configuration.
//!
//! Everything is read once at process start. Lookups go through a
//! closure so tests can feed a map instead of mutating the process
//! environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgConnectOptions;

use crate::domain::ConfigError;
use crate::infra::observability::LogFormat;
use crate::infra::search::{DEFAULT_INDEX, SearchClientConfig};
use crate::infra::PostgresConfig;

const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_SEARCH_ENDPOINT: &str = "http://localhost:9200";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Where the relational store lives.
#[derive(Debug, Clone)]
pub enum DatabaseTarget {
    /// A full `postgres://` URL (`DATABASE_URL`)
    Url(SecretString),
    /// Individual connection parts (`DB_HOST`, `DB_USER`, ...)
    Parts {
        host: String,
        port: u16,
        user: String,
        password: SecretString,
        name: String,
    },
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub target: DatabaseTarget,
    pub max_connections: u32,
}

impl DatabaseSettings {
    /// Build sqlx connect options without logging the password.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        match &self.target {
            DatabaseTarget::Url(url) => PgConnectOptions::from_str(url.expose_secret())
                .map_err(|e| ConfigError::InvalidValue {
                    key: "DATABASE_URL".to_string(),
                    message: e.to_string(),
                }),
            DatabaseTarget::Parts {
                host,
                port,
                user,
                password,
                name,
            } => Ok(PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(user)
                .password(password.expose_secret())
                .database(name)),
        }
    }

    #[must_use]
    pub fn pool_config(&self) -> PostgresConfig {
        PostgresConfig {
            max_connections: self.max_connections,
            min_connections: self.max_connections.min(PostgresConfig::default().min_connections),
            ..PostgresConfig::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub endpoint: String,
    pub index: String,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

impl SearchSettings {
    #[must_use]
    pub fn client_config(&self) -> SearchClientConfig {
        SearchClientConfig {
            index: self.index.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            ..SearchClientConfig::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
}

impl ServerSettings {
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                key: "HOST".to_string(),
                message: e.to_string(),
            })
    }
}

/// Complete process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub search: SearchSettings,
    pub server: ServerSettings,
    pub log_format: LogFormat,
    pub run_migrations: bool,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()));

        let target = match get("DATABASE_URL") {
            Some(url) => DatabaseTarget::Url(SecretString::from(url)),
            None => DatabaseTarget::Parts {
                host: require("DB_HOST")?,
                port: parse_or(get("DB_PORT"), "DB_PORT", DEFAULT_DB_PORT)?,
                user: require("DB_USER")?,
                password: SecretString::from(require("DB_PASS")?),
                name: require("DB_NAME")?,
            },
        };

        let database = DatabaseSettings {
            target,
            max_connections: parse_or(
                get("DB_MAX_CONNECTIONS"),
                "DB_MAX_CONNECTIONS",
                PostgresConfig::default().max_connections,
            )?,
        };

        let search = SearchSettings {
            endpoint: get("OS_ENDPOINT").unwrap_or_else(|| DEFAULT_SEARCH_ENDPOINT.to_string()),
            index: get("OS_INDEX").unwrap_or_else(|| DEFAULT_INDEX.to_string()),
            username: get("OS_USERNAME"),
            password: get("OS_PASSWORD").map(SecretString::from),
        };

        let server = ServerSettings {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(get("PORT"), "PORT", DEFAULT_PORT)?,
            request_timeout: Duration::from_secs(parse_or(
                get("REQUEST_TIMEOUT_SECS"),
                "REQUEST_TIMEOUT_SECS",
                30u64,
            )?),
        };

        let log_format = parse_or(get("LOG_FORMAT"), "LOG_FORMAT", LogFormat::default())?;
        let run_migrations = match get("RUN_MIGRATIONS") {
            Some(value) => parse_bool(&value).ok_or_else(|| ConfigError::InvalidValue {
                key: "RUN_MIGRATIONS".to_string(),
                message: format!("expected true/false, got '{value}'"),
            })?,
            None => true,
        };

        Ok(Self {
            database,
            search,
            server,
            log_format,
            run_migrations,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const PARTS: &[(&str, &str)] = &[
        ("DB_HOST", "db.internal"),
        ("DB_USER", "directory"),
        ("DB_PASS", "s3cret"),
        ("DB_NAME", "clinic"),
    ];

    #[test]
    fn test_defaults_from_parts() {
        let config = AppConfig::from_lookup(lookup_from(PARTS)).unwrap();

        match &config.database.target {
            DatabaseTarget::Parts {
                host, port, user, name, ..
            } => {
                assert_eq!(host, "db.internal");
                assert_eq!(*port, 5432);
                assert_eq!(user, "directory");
                assert_eq!(name, "clinic");
            }
            other => panic!("expected parts, got {other:?}"),
        }
        assert_eq!(config.search.endpoint, "http://localhost:9200");
        assert_eq!(config.search.index, "doctors");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.request_timeout, Duration::from_secs(30));
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.run_migrations);
    }

    #[test]
    fn test_connect_options_from_parts() {
        let config = AppConfig::from_lookup(lookup_from(PARTS)).unwrap();
        let options = config.database.connect_options().unwrap();

        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_username(), "directory");
        assert_eq!(options.get_database(), Some("clinic"));
    }

    #[test]
    fn test_database_url_takes_precedence() {
        let config = AppConfig::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://app:pw@localhost:6543/doctors",
        )]))
        .unwrap();

        assert!(matches!(config.database.target, DatabaseTarget::Url(_)));
        let options = config.database.connect_options().unwrap();
        assert_eq!(options.get_port(), 6543);
    }

    #[test]
    fn test_missing_database_settings() {
        let err = AppConfig::from_lookup(lookup_from(&[("DB_HOST", "db")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "DB_USER"));
    }

    #[test]
    fn test_invalid_port() {
        let mut pairs = PARTS.to_vec();
        pairs.push(("PORT", "eighty"));
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "PORT"));
    }

    #[test]
    fn test_search_and_server_overrides() {
        let mut pairs = PARTS.to_vec();
        pairs.extend_from_slice(&[
            ("OS_ENDPOINT", "https://search.example.com"),
            ("OS_INDEX", "doctors_v2"),
            ("OS_USERNAME", "admin"),
            ("OS_PASSWORD", "admin-pw"),
            ("PORT", "8080"),
            ("LOG_FORMAT", "json"),
            ("RUN_MIGRATIONS", "false"),
        ]);
        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();

        let client = config.search.client_config();
        assert_eq!(client.index, "doctors_v2");
        assert_eq!(client.username.as_deref(), Some("admin"));
        assert!(client.password.is_some());
        assert_eq!(config.server.bind_address().unwrap().port(), 8080);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let mut pairs = PARTS.to_vec();
        pairs.push(("OS_ENDPOINT", "  "));
        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.search.endpoint, "http://localhost:9200");
    }

    #[test]
    fn test_pool_config_respects_small_max() {
        let mut pairs = PARTS.to_vec();
        pairs.push(("DB_MAX_CONNECTIONS", "1"));
        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();

        let pool = config.database.pool_config();
        assert_eq!(pool.max_connections, 1);
        assert_eq!(pool.min_connections, 1);
    }

    #[test]
    fn test_invalid_run_migrations() {
        let mut pairs = PARTS.to_vec();
        pairs.push(("RUN_MIGRATIONS", "maybe"));
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "RUN_MIGRATIONS"));
    }
}
