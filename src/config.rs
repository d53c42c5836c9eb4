//! Configuration management.
//!
//! Values come from built-in defaults, `BIBLIO_`-prefixed environment
//! variables (`BIBLIO_SERVER__PORT`, `BIBLIO_DATABASE__URL`, ...) and the
//! plain variables HOST, PORT, DATABASE_URL, DATABASE_MAX_CONNECTIONS and
//! STORAGE, which take precedence. A `.env` file is loaded by `main`.

use config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error("STORAGE=postgres requires DATABASE_URL")]
    MissingDatabaseUrl,
}

/// Where entities are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    server: ServerConfig,
    database: DatabaseConfig,
    #[serde(default)]
    storage: Option<StorageBackend>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageBackend,
}

fn prefixed_environment() -> Environment {
    Environment::with_prefix("BIBLIO")
        .prefix_separator("_")
        .separator("__")
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(prefixed_environment(), |key| std::env::var(key).ok())
    }

    /// Build the configuration from an environment source and a lookup
    /// for the plain (unprefixed) variables
    ///
    /// STORAGE defaults to `postgres` when a database URL is set and to
    /// `memory` otherwise.
    fn load(
        environment: Environment,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let raw: RawConfig = Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default(
                "database.max_connections",
                i64::from(DEFAULT_MAX_CONNECTIONS),
            )?
            .add_source(environment)
            .set_override_option("server.host", lookup("HOST"))?
            .set_override_option("server.port", lookup("PORT"))?
            .set_override_option("database.url", lookup("DATABASE_URL"))?
            .set_override_option(
                "database.max_connections",
                lookup("DATABASE_MAX_CONNECTIONS"),
            )?
            .set_override_option("storage", lookup("STORAGE"))?
            .build()?
            .try_deserialize()?;

        Self::resolve(raw)
    }

    fn resolve(raw: RawConfig) -> Result<Self, ConfigError> {
        let mut database = raw.database;
        database.url = database.url.filter(|url| !url.trim().is_empty());

        let storage = match raw.storage {
            Some(storage) => storage,
            None if database.url.is_some() => StorageBackend::Postgres,
            None => StorageBackend::Memory,
        };

        if storage == StorageBackend::Postgres && database.url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        Ok(Self {
            server: raw.server,
            database,
            storage,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Plain variables only; the prefixed source is empty
    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let plain = vars(pairs);
        let environment = prefixed_environment().source(Some(HashMap::new()));
        AppConfig::load(environment, |key| plain.get(key).cloned())
    }

    #[test]
    fn test_defaults_to_memory_without_database_url() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_database_url_selects_postgres() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/library")]).unwrap();
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://localhost/library")
        );
    }

    #[test]
    fn test_empty_database_url_is_ignored() {
        let config = config_from(&[("DATABASE_URL", "  ")]).unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_explicit_memory_overrides_database_url() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/library"),
            ("STORAGE", "memory"),
        ])
        .unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
    }

    #[test]
    fn test_postgres_without_url_is_rejected() {
        let result = config_from(&[("STORAGE", "postgres")]);
        assert!(matches!(result, Err(ConfigError::MissingDatabaseUrl)));
    }

    #[test]
    fn test_unknown_storage_is_rejected() {
        let result = config_from(&[("STORAGE", "redis")]);
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = config_from(&[("PORT", "eighty")]);
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_custom_host_port_and_pool_size() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DATABASE_MAX_CONNECTIONS", "20"),
        ])
        .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.database.max_connections, 20);
    }

    #[test]
    fn test_prefixed_variables_are_read() {
        let environment = prefixed_environment().source(Some(vars(&[
            ("BIBLIO_SERVER__PORT", "9000"),
            ("BIBLIO_DATABASE__URL", "postgres://db/library"),
        ])));
        let config = AppConfig::load(environment, |_| None).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage, StorageBackend::Postgres);
    }

    #[test]
    fn test_plain_variables_win_over_prefixed() {
        let environment =
            prefixed_environment().source(Some(vars(&[("BIBLIO_SERVER__PORT", "9000")])));
        let config = AppConfig::load(environment, |key| {
            (key == "PORT").then(|| "8081".to_string())
        })
        .unwrap();
        assert_eq!(config.server.port, 8081);
    }
}
