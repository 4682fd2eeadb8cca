//! Read-only access to schema metadata.
//!
//! [`MetadataSource`] is the seam between the pipeline and a live database.
//! The MySQL adapter implements it over a connection pool; tests implement it
//! over in-memory vectors.

use crate::Result;
use crate::models::{Column, Constraint, Table};
use async_trait::async_trait;

/// Source of information-schema metadata for one database instance.
///
/// Implementations must bind `schema` and `table` as query parameters and
/// never splice them into query text.
///
/// # Object Safety
/// This trait is object-safe, so the pipeline can run against
/// `&dyn MetadataSource`.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Checks that the metadata views are readable.
    ///
    /// The default implementation assumes they are.
    async fn verify_access(&self) -> Result<()> {
        Ok(())
    }

    /// Lists every table and view in `schema`.
    ///
    /// Table types outside the known set come back as
    /// [`TableType::Unknown`](crate::models::TableType::Unknown).
    async fn list_tables(&self, schema: &str) -> Result<Vec<Table>>;

    /// Lists the columns of one table, ordered by ordinal position.
    async fn list_columns(&self, schema: &str, table: &str) -> Result<Vec<Column>>;

    /// Lists one row per (constraint, column) pair of one table.
    async fn list_constraints(&self, schema: &str, table: &str) -> Result<Vec<Constraint>>;

    /// Short name of the backing engine, used in log lines
    fn engine_name(&self) -> &'static str;
}
