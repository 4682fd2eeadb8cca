//! MySQL connection pool management and validation.
//!
//! # Security Features
//! - Connect options are built field by field, never from a URL string, so
//!   passwords need no escaping and never pass through a parser that might
//!   echo them in an error
//! - Sessions are switched to read-only transactions on connect
//! - Statement logging is disabled

use super::MySqlSource;
use crate::Result;
use crate::config::DatabaseConfig;
use crate::error::ErdumpError;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{ConnectOptions, MySqlPool};

impl MySqlSource {
    /// Opens a connection pool for `config` and wraps it.
    ///
    /// The first connection is established eagerly, so an unreachable server
    /// or rejected credentials fail here rather than on the first query.
    ///
    /// # Errors
    /// Returns a configuration error for invalid settings, or a connection
    /// error if the server cannot be reached or refuses the login.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        config.validate()?;

        let target = describe_target(config);
        tracing::info!("Connecting to MySQL at {}", target);

        let pool = create_mysql_connection_pool(config, &target).await?;

        tracing::debug!("Connection pool ready ({} connections)", pool.size());
        Ok(Self::from_pool(pool, target))
    }
}

/// Builds connect options from validated settings.
///
/// An empty password is omitted entirely so servers allowing password-less
/// logins accept the handshake.
pub fn connect_options(config: &DatabaseConfig) -> MySqlConnectOptions {
    let mut options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.username)
        .database(&config.database);

    if !config.password().is_empty() {
        options = options.password(config.password());
    }

    options.disable_statement_logging()
}

/// `host:port/database`, safe for logs
fn describe_target(config: &DatabaseConfig) -> String {
    format!("{}:{}/{}", config.host, config.port, config.database)
}

/// Creates a MySQL connection pool with read-only sessions
async fn create_mysql_connection_pool(config: &DatabaseConfig, target: &str) -> Result<MySqlPool> {
    use sqlx::Executor;

    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET SESSION TRANSACTION READ ONLY").await?;
                Ok(())
            })
        })
        .connect_with(connect_options(config))
        .await
        .map_err(|e| ErdumpError::connection_failed(target, e))
}

/// Checks basic connectivity and read access to `INFORMATION_SCHEMA`.
///
/// # Errors
/// Returns a connection error if `SELECT 1` fails, or an insufficient
/// privileges error if the information schema cannot be read.
pub async fn verify_access(pool: &MySqlPool) -> Result<()> {
    let connectivity_result: i64 = sqlx::query_scalar("SELECT 1")
        .fetch_one(pool)
        .await
        .map_err(|e| ErdumpError::connection_failed("connectivity check", e))?;

    if connectivity_result != 1 {
        return Err(ErdumpError::configuration(
            "Basic connectivity test failed: unexpected result",
        ));
    }

    let schema_access_test: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_SCHEMA = 'information_schema'",
    )
    .fetch_one(pool)
    .await
    .map_err(|e| {
        ErdumpError::insufficient_privileges(format!("Cannot access INFORMATION_SCHEMA: {}", e))
    })?;

    if schema_access_test == 0 {
        return Err(ErdumpError::insufficient_privileges(
            "No access to INFORMATION_SCHEMA tables",
        ));
    }

    tracing::debug!("INFORMATION_SCHEMA is readable");
    Ok(())
}
