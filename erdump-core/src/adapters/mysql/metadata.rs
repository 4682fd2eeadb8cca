//! `INFORMATION_SCHEMA` queries for tables, columns and key usage.
//!
//! Every text column is cast to CHAR so MySQL 8.0 returns character data
//! instead of VARBINARY. Identifiers are bound, never interpolated.

use crate::Result;
use crate::error::ErdumpError;
use crate::models::{Column, Constraint, Table, TableType};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, Row};

const TABLES_QUERY: &str = r#"
    SELECT
        CAST(TABLE_SCHEMA AS CHAR) as TABLE_SCHEMA,
        CAST(TABLE_NAME AS CHAR) as TABLE_NAME,
        CAST(TABLE_TYPE AS CHAR) as TABLE_TYPE
    FROM INFORMATION_SCHEMA.TABLES
    WHERE TABLE_SCHEMA = ?
    ORDER BY TABLE_NAME
"#;

const COLUMNS_QUERY: &str = r#"
    SELECT
        CAST(c.TABLE_SCHEMA AS CHAR) as TABLE_SCHEMA,
        CAST(c.TABLE_NAME AS CHAR) as TABLE_NAME,
        CAST(c.COLUMN_NAME AS CHAR) as COLUMN_NAME,
        CAST(c.ORDINAL_POSITION AS UNSIGNED) as ORDINAL_POSITION,
        CAST(c.COLUMN_DEFAULT AS CHAR) as COLUMN_DEFAULT,
        CAST(c.IS_NULLABLE AS CHAR) as IS_NULLABLE,
        CAST(c.DATA_TYPE AS CHAR) as DATA_TYPE,
        CAST(c.COLUMN_TYPE AS CHAR) as COLUMN_TYPE
    FROM INFORMATION_SCHEMA.COLUMNS c
    WHERE c.TABLE_SCHEMA = ?
    AND c.TABLE_NAME = ?
    ORDER BY c.ORDINAL_POSITION
"#;

// EXTRA and COLUMN_KEY describe the source column, so they come from
// COLUMNS rather than from the key usage view itself.
const CONSTRAINTS_QUERY: &str = r#"
    SELECT
        CAST(kcu.CONSTRAINT_NAME AS CHAR) as CONSTRAINT_NAME,
        CAST(kcu.TABLE_SCHEMA AS CHAR) as SOURCE_SCHEMA,
        CAST(kcu.TABLE_NAME AS CHAR) as SOURCE_TABLE,
        CAST(kcu.COLUMN_NAME AS CHAR) as SOURCE_COLUMN,
        CAST(kcu.REFERENCED_TABLE_SCHEMA AS CHAR) as TARGET_SCHEMA,
        CAST(kcu.REFERENCED_TABLE_NAME AS CHAR) as TARGET_TABLE,
        CAST(kcu.REFERENCED_COLUMN_NAME AS CHAR) as TARGET_COLUMN,
        CAST(c.EXTRA AS CHAR) as EXTRA,
        CAST(c.COLUMN_KEY AS CHAR) as COLUMN_KEY
    FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu
    LEFT JOIN INFORMATION_SCHEMA.COLUMNS c
        ON c.TABLE_SCHEMA = kcu.TABLE_SCHEMA
        AND c.TABLE_NAME = kcu.TABLE_NAME
        AND c.COLUMN_NAME = kcu.COLUMN_NAME
    WHERE kcu.TABLE_SCHEMA = ?
    AND kcu.TABLE_NAME = ?
    ORDER BY kcu.CONSTRAINT_NAME, kcu.ORDINAL_POSITION
"#;

/// Decodes one named field, attributing failures to `table`.
fn field<'r, T>(row: &'r MySqlRow, name: &str, table: Option<&str>) -> Result<T>
where
    T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
{
    row.try_get(name)
        .map_err(|e| ErdumpError::parse_field(name, table, e))
}

/// Lists every table and view in `schema`, ordered by name.
pub async fn list_tables(pool: &MySqlPool, schema: &str) -> Result<Vec<Table>> {
    tracing::debug!("Enumerating tables in schema '{}'", schema);

    let rows = sqlx::query(TABLES_QUERY)
        .bind(schema)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            ErdumpError::query_failed(format!("Failed to enumerate tables in '{}'", schema), e)
        })?;

    rows.iter().map(table_from_row).collect()
}

fn table_from_row(row: &MySqlRow) -> Result<Table> {
    let raw_type: Option<String> = field(row, "TABLE_TYPE", None)?;
    let table_type = raw_type
        .as_deref()
        .map_or(TableType::Unknown, TableType::from_raw);

    Ok(Table {
        schema: field(row, "TABLE_SCHEMA", None)?,
        name: field(row, "TABLE_NAME", None)?,
        table_type,
    })
}

/// Lists the columns of `schema`.`table` in ordinal order.
pub async fn list_columns(pool: &MySqlPool, schema: &str, table: &str) -> Result<Vec<Column>> {
    let rows = sqlx::query(COLUMNS_QUERY)
        .bind(schema)
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            ErdumpError::query_failed(
                format!("Failed to collect columns for table '{}'", table),
                e,
            )
        })?;

    let columns = rows
        .iter()
        .map(|row| column_from_row(row, table))
        .collect::<Result<Vec<_>>>()?;

    tracing::trace!("Table '{}' has {} columns", table, columns.len());
    Ok(columns)
}

fn column_from_row(row: &MySqlRow, table: &str) -> Result<Column> {
    let ctx = Some(table);
    let ordinal: u64 = field(row, "ORDINAL_POSITION", ctx)?;
    let ordinal_position = u32::try_from(ordinal)
        .map_err(|e| ErdumpError::parse_field("ORDINAL_POSITION", ctx, e))?;
    let is_nullable: String = field(row, "IS_NULLABLE", ctx)?;

    Ok(Column {
        table_schema: field(row, "TABLE_SCHEMA", ctx)?,
        table_name: field(row, "TABLE_NAME", ctx)?,
        name: field(row, "COLUMN_NAME", ctx)?,
        ordinal_position,
        default_value: field(row, "COLUMN_DEFAULT", ctx)?,
        is_nullable: is_nullable.eq_ignore_ascii_case("YES"),
        data_type: field(row, "DATA_TYPE", ctx)?,
        column_type: field(row, "COLUMN_TYPE", ctx)?,
    })
}

/// Lists one row per (constraint, column) pair of `schema`.`table`.
pub async fn list_constraints(
    pool: &MySqlPool,
    schema: &str,
    table: &str,
) -> Result<Vec<Constraint>> {
    let rows = sqlx::query(CONSTRAINTS_QUERY)
        .bind(schema)
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            ErdumpError::query_failed(
                format!("Failed to collect constraints for table '{}'", table),
                e,
            )
        })?;

    let constraints = rows
        .iter()
        .map(|row| constraint_from_row(row, table))
        .collect::<Result<Vec<_>>>()?;

    tracing::trace!("Table '{}' has {} key usage rows", table, constraints.len());
    Ok(constraints)
}

fn constraint_from_row(row: &MySqlRow, table: &str) -> Result<Constraint> {
    let ctx = Some(table);
    let extra: Option<String> = field(row, "EXTRA", ctx)?;
    let column_key: Option<String> = field(row, "COLUMN_KEY", ctx)?;

    Ok(Constraint {
        constraint_name: field(row, "CONSTRAINT_NAME", ctx)?,
        source_schema: field(row, "SOURCE_SCHEMA", ctx)?,
        source_table: field(row, "SOURCE_TABLE", ctx)?,
        source_column: field(row, "SOURCE_COLUMN", ctx)?,
        target_schema: field(row, "TARGET_SCHEMA", ctx)?,
        target_table: field(row, "TARGET_TABLE", ctx)?,
        target_column: field(row, "TARGET_COLUMN", ctx)?,
        extra: extra.unwrap_or_default(),
        column_key: column_key.unwrap_or_default(),
    })
}
