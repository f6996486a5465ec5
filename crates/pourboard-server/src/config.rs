//! Configuration for the pourboard server.
//!
//! All configuration is loaded from environment variables. The server
//! needs to know where to listen and how to reach the item store.

use std::net::SocketAddr;
use std::time::Duration;

use pourboard_db::PostgresConfig;

/// Default listen port.
const DEFAULT_PORT: u16 = 3000;

/// Default database name.
const DEFAULT_DB_NAME: &str = "winecounter";

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid {key}: {message}")]
    Invalid {
        /// The offending variable.
        key: &'static str,
        /// Why it was rejected.
        message: String,
    },
}

/// Which item store backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Durable `PostgreSQL` store.
    Postgres,
    /// Volatile in-process store, for demos.
    Memory,
}

/// Complete server configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
    /// Selected store backend.
    pub store: StoreKind,
    /// `PostgreSQL` connection string. Required for [`StoreKind::Postgres`].
    pub database_url: Option<String>,
    /// Database name, overriding the one in the URL.
    pub database_name: String,
    /// Maximum pooled connections.
    pub db_max_connections: u32,
    /// Pool acquire timeout.
    pub db_connect_timeout: Duration,
    /// How long an unused pooled connection is kept open.
    pub db_idle_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: DEFAULT_PORT,
            store: StoreKind::Postgres,
            database_url: None,
            database_name: String::from(DEFAULT_DB_NAME),
            db_max_connections: 10,
            db_connect_timeout: Duration::from_secs(5),
            db_idle_timeout: Duration::from_secs(300),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables (all optional unless noted):
    /// - `DATABASE_URL` -- `PostgreSQL` connection string (required when `STORE=postgres`)
    /// - `DB_NAME` -- database name (default `winecounter`)
    /// - `PORT` -- listen port (default 3000)
    /// - `HOST` -- listen address (default `0.0.0.0`)
    /// - `STORE` -- `postgres` or `memory` (default `postgres`)
    /// - `DB_MAX_CONNECTIONS` -- pool size (default 10)
    /// - `DB_CONNECT_TIMEOUT_SECS` -- pool acquire timeout (default 5)
    /// - `DB_IDLE_TIMEOUT_SECS` -- idle connection timeout (default 300)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let store = match lookup("STORE").as_deref().map(str::trim) {
            None | Some("" | "postgres") => StoreKind::Postgres,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "STORE",
                    message: format!("expected `postgres` or `memory`, got {other:?}"),
                });
            }
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if store == StoreKind::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let port = parse_or("PORT", lookup("PORT"), defaults.port)?;
        let db_max_connections = parse_or(
            "DB_MAX_CONNECTIONS",
            lookup("DB_MAX_CONNECTIONS"),
            defaults.db_max_connections,
        )?;
        let connect_timeout_secs = parse_or(
            "DB_CONNECT_TIMEOUT_SECS",
            lookup("DB_CONNECT_TIMEOUT_SECS"),
            defaults.db_connect_timeout.as_secs(),
        )?;
        let idle_timeout_secs = parse_or(
            "DB_IDLE_TIMEOUT_SECS",
            lookup("DB_IDLE_TIMEOUT_SECS"),
            defaults.db_idle_timeout.as_secs(),
        )?;

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            store,
            database_url,
            database_name: lookup("DB_NAME").unwrap_or(defaults.database_name),
            db_max_connections,
            db_connect_timeout: Duration::from_secs(connect_timeout_secs),
            db_idle_timeout: Duration::from_secs(idle_timeout_secs),
        })
    }

    /// The socket address to listen on.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid {
                key: "HOST",
                message: format!("{e}"),
            })
    }

    /// Pool settings for the `PostgreSQL` store.
    pub fn postgres_config(&self) -> Result<PostgresConfig, ConfigError> {
        let url = self
            .database_url
            .as_deref()
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        Ok(PostgresConfig::new(url)
            .with_database(&self.database_name)
            .with_max_connections(self.db_max_connections)
            .with_connect_timeout(self.db_connect_timeout)
            .with_idle_timeout(self.db_idle_timeout))
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e| ConfigError::Invalid {
            key,
            message: format!("{e}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_with_database_url() {
        let config =
            ServerConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgresql://localhost")]));
        let Ok(config) = config else {
            panic!("config rejected");
        };
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.database_name, "winecounter");
        assert_eq!(config.store, StoreKind::Postgres);
    }

    #[test]
    fn postgres_requires_database_url() {
        let config = ServerConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(config, Err(ConfigError::Missing("DATABASE_URL"))));
    }

    #[test]
    fn memory_store_needs_no_url() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("STORE", "memory"),
            ("PORT", "8081"),
            ("DB_NAME", "pours"),
        ]));
        let Ok(config) = config else {
            panic!("config rejected");
        };
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.port, 8081);
        assert_eq!(config.database_name, "pours");
        assert!(config.postgres_config().is_err());
    }

    #[test]
    fn bad_values_are_reported() {
        let config = ServerConfig::from_lookup(lookup_from(&[("STORE", "memory"), ("PORT", "80a")]));
        assert!(matches!(config, Err(ConfigError::Invalid { key: "PORT", .. })));

        let config = ServerConfig::from_lookup(lookup_from(&[("STORE", "mongo")]));
        assert!(matches!(config, Err(ConfigError::Invalid { key: "STORE", .. })));
    }

    #[test]
    fn pool_timeouts_reach_postgres_config() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgresql://localhost"),
            ("DB_CONNECT_TIMEOUT_SECS", "2"),
            ("DB_IDLE_TIMEOUT_SECS", "45"),
        ]));
        let Ok(config) = config else {
            panic!("config rejected");
        };
        let Ok(pg) = config.postgres_config() else {
            panic!("postgres config rejected");
        };
        assert_eq!(pg.connect_timeout, Duration::from_secs(2));
        assert_eq!(pg.idle_timeout, Duration::from_secs(45));
        assert_eq!(pg.database.as_deref(), Some("winecounter"));

        let config = ServerConfig::from_lookup(lookup_from(&[
            ("STORE", "memory"),
            ("DB_IDLE_TIMEOUT_SECS", "soon"),
        ]));
        assert!(matches!(
            config,
            Err(ConfigError::Invalid {
                key: "DB_IDLE_TIMEOUT_SECS",
                ..
            })
        ));
    }

    #[test]
    fn bind_addr_combines_host_and_port() {
        let config = ServerConfig {
            host: String::from("127.0.0.1"),
            port: 4000,
            ..ServerConfig::default()
        };
        assert_eq!(
            config.bind_addr().ok().map(|a| a.to_string()),
            Some(String::from("127.0.0.1:4000"))
        );
    }
}
