//! MySQL metadata source backed by a `sqlx` connection pool.
//!
//! # Module Structure
//! - `connection`: pool construction and access checks
//! - `metadata`: `INFORMATION_SCHEMA` queries and row mapping
//!
//! # Security Guarantees
//! - Sessions are read-only and only SELECT statements are issued
//! - Schema and table names are always bound parameters
//! - Statement logging is disabled on the connection options

pub mod connection;
pub mod metadata;

#[cfg(test)]
mod tests;

use crate::Result;
use crate::models::{Column, Constraint, Table};
use crate::source::MetadataSource;
use async_trait::async_trait;
use sqlx::MySqlPool;

pub use connection::connect_options;

/// MySQL implementation of [`MetadataSource`]
pub struct MySqlSource {
    pool: MySqlPool,
    /// Credential-free description of the server, for log and error context
    target: String,
}

impl std::fmt::Debug for MySqlSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlSource")
            .field("target", &self.target)
            .field("pool_size", &self.pool.size())
            .field("pool_idle", &self.pool.num_idle())
            .finish()
    }
}

impl MySqlSource {
    /// Wraps an existing pool.
    pub fn from_pool(pool: MySqlPool, target: impl Into<String>) -> Self {
        Self {
            pool,
            target: target.into(),
        }
    }

    /// Closes the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl MetadataSource for MySqlSource {
    async fn verify_access(&self) -> Result<()> {
        connection::verify_access(&self.pool).await
    }

    async fn list_tables(&self, schema: &str) -> Result<Vec<Table>> {
        metadata::list_tables(&self.pool, schema).await
    }

    async fn list_columns(&self, schema: &str, table: &str) -> Result<Vec<Column>> {
        metadata::list_columns(&self.pool, schema, table).await
    }

    async fn list_constraints(&self, schema: &str, table: &str) -> Result<Vec<Constraint>> {
        metadata::list_constraints(&self.pool, schema, table).await
    }

    fn engine_name(&self) -> &'static str {
        "MySQL"
    }
}
