//! Sequential introspection pipeline.
//!
//! Tables are processed one at a time; for each table the columns are fetched
//! before the constraints. The first failure aborts the run and no partial
//! snapshot is returned.

use crate::Result;
use crate::models::{SchemaSnapshot, TableSnapshot};
use crate::render::{OutputFormat, RenderOptions, render};
use crate::source::MetadataSource;

/// Reads every table of `schema` with its columns and constraints.
///
/// # Errors
/// Returns the first error raised by `source`.
pub async fn collect_snapshot(
    source: &dyn MetadataSource,
    schema: &str,
) -> Result<SchemaSnapshot> {
    let start_time = std::time::Instant::now();

    tracing::info!(
        "Starting {} schema introspection for '{}'",
        source.engine_name(),
        schema
    );

    let tables = source.list_tables(schema).await.map_err(|e| {
        tracing::error!("Failed to list tables: {}", e);
        e
    })?;
    tracing::debug!("Found {} tables", tables.len());

    let mut snapshot = SchemaSnapshot::new(schema);

    for table in tables {
        let columns = source.list_columns(schema, &table.name).await.map_err(|e| {
            tracing::error!("Failed to read columns of '{}': {}", table.name, e);
            e
        })?;
        let constraints = source
            .list_constraints(schema, &table.name)
            .await
            .map_err(|e| {
                tracing::error!("Failed to read constraints of '{}': {}", table.name, e);
                e
            })?;

        tracing::debug!(
            "Collected {} '{}' with {} columns, {} key usage rows",
            table.table_type,
            table.name,
            columns.len(),
            constraints.len()
        );

        snapshot.tables.push(TableSnapshot {
            table,
            columns,
            constraints,
        });
    }

    tracing::info!(
        "Schema introspection completed in {:.2}s - {} tables, {} columns, {} key usage rows",
        start_time.elapsed().as_secs_f64(),
        snapshot.tables.len(),
        snapshot.column_count(),
        snapshot.constraint_count()
    );

    Ok(snapshot)
}

/// Collects `schema` and renders it in one step.
///
/// # Errors
/// Returns the first collection error, or a serialization error for JSON
/// output.
pub async fn generate_diagram(
    source: &dyn MetadataSource,
    schema: &str,
    format: OutputFormat,
    options: RenderOptions,
) -> Result<String> {
    let snapshot = collect_snapshot(source, schema).await?;
    render(&snapshot, format, options)
}
