//! Environment-driven database configuration.
//!
//! All five settings are required. Empty values count as missing, and the
//! port must parse as a non-zero `u16`. Validation happens before any
//! connection attempt.
//!
//! # Security
//! The password lives in a [`Zeroizing`] buffer and is omitted from both
//! `Debug` and `Display` output.

use crate::Result;
use crate::error::ErdumpError;
use std::collections::HashMap;
use std::env::VarError;
use std::time::Duration;
use zeroize::Zeroizing;

/// Environment variable naming the database host
pub const ENV_HOST: &str = "DATABASE_HOST";
/// Environment variable naming the database, also the schema to scan
pub const ENV_NAME: &str = "DATABASE_NAME";
/// Environment variable holding the login user
pub const ENV_USERNAME: &str = "DATABASE_USERNAME";
/// Environment variable holding the login password
pub const ENV_PASSWORD: &str = "DATABASE_PASSWORD";
/// Environment variable holding the TCP port
pub const ENV_PORT: &str = "DATABASE_PORT";

const REQUIRED_VARS: [&str; 5] = [ENV_HOST, ENV_NAME, ENV_USERNAME, ENV_PASSWORD, ENV_PORT];

/// Connection settings for one database instance.
///
/// # Example
/// ```rust
/// use erdump_core::config::DatabaseConfig;
///
/// let config = DatabaseConfig::new("localhost", 3306, "shop", "reader", "secret");
/// assert_eq!(config.to_string(), "reader@localhost:3306/shop");
/// assert!(!format!("{:?}", config).contains("secret"));
/// ```
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Server hostname or IP address
    pub host: String,
    /// Server TCP port
    pub port: u16,
    /// Database to connect to; doubles as the schema that gets scanned
    pub database: String,
    /// Login user
    pub username: String,
    password: Zeroizing<String>,
    /// Upper bound for establishing or acquiring a pooled connection
    pub connect_timeout: Duration,
    /// Pool size; the pipeline only ever uses one connection at a time
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("connect_timeout", &self.connect_timeout)
            .field("max_connections", &self.max_connections)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}:{}/{}", self.username, self.host, self.port, self.database)
    }
}

impl DatabaseConfig {
    /// Creates a config with default pool settings.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
            username: username.into(),
            password: Zeroizing::new(password.into()),
            connect_timeout: Duration::from_secs(30),
            max_connections: 1,
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns a configuration error naming every missing variable, or the
    /// first malformed one. A value that is not valid UTF-8 is malformed.
    pub fn from_env() -> Result<Self> {
        let mut values = HashMap::with_capacity(REQUIRED_VARS.len());
        for key in REQUIRED_VARS {
            match std::env::var(key) {
                Ok(value) => {
                    values.insert(key, Zeroizing::new(value));
                }
                Err(VarError::NotPresent) => {}
                Err(VarError::NotUnicode(_)) => {
                    return Err(ErdumpError::configuration(format!(
                        "{key} is malformed: value is not valid UTF-8"
                    )));
                }
            }
        }

        Self::from_lookup(|key| values.get(key).map(|value| String::clone(value)))
    }

    /// Reads the configuration through an arbitrary key lookup.
    ///
    /// Missing variables are collected and reported together so a single run
    /// shows everything that needs fixing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let host = read(ENV_HOST);
        let database = read(ENV_NAME);
        let username = read(ENV_USERNAME);
        let password = read(ENV_PASSWORD).map(Zeroizing::new);
        let port = read(ENV_PORT);

        let missing: Vec<&str> = [
            (ENV_HOST, host.is_none()),
            (ENV_NAME, database.is_none()),
            (ENV_USERNAME, username.is_none()),
            (ENV_PASSWORD, password.is_none()),
            (ENV_PORT, port.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then_some(key))
        .collect();

        let (Some(host), Some(database), Some(username), Some(password), Some(port)) =
            (host, database, username, password, port)
        else {
            return Err(ErdumpError::configuration(format!(
                "missing required environment variable(s): {}",
                missing.join(", ")
            )));
        };

        let port = parse_port(&port)?;

        let config = Self {
            password,
            ..Self::new(host, port, database, username, String::new())
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates connection parameters.
    ///
    /// # Errors
    /// Returns error if a value cannot be used to open a connection
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ErdumpError::configuration("host cannot be empty"));
        }

        if self.port == 0 {
            return Err(ErdumpError::configuration("port must be greater than 0"));
        }

        if self.database.is_empty() || self.database.len() > 64 {
            return Err(ErdumpError::configuration(format!(
                "Invalid database name length: must be 1-64 characters, got {}",
                self.database.len()
            )));
        }

        if self.username.is_empty() {
            return Err(ErdumpError::configuration("username cannot be empty"));
        }

        if self.max_connections == 0 {
            return Err(ErdumpError::configuration("max_connections must be greater than 0"));
        }

        if self.connect_timeout.is_zero() {
            return Err(ErdumpError::configuration("connect_timeout must be greater than 0"));
        }

        Ok(())
    }

    /// The password, still behind the zeroizing buffer owned by this config
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Schema whose tables are scanned
    pub fn schema(&self) -> &str {
        &self.database
    }

    /// Builder method to set the connect timeout
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builder method to set the pool size
    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

fn parse_port(raw: &str) -> Result<u16> {
    match raw.trim().parse::<u16>() {
        Ok(0) => Err(ErdumpError::configuration(format!("{ENV_PORT} must be greater than 0"))),
        Ok(port) => Ok(port),
        Err(e) => Err(ErdumpError::configuration(format!(
            "{ENV_PORT} must be a port number, got '{}': {}",
            raw, e
        ))),
    }
}
