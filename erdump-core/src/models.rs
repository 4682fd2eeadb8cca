//! Typed snapshots of information-schema metadata.
//!
//! Every value here is read once per run and never mutated. Nullable
//! information-schema fields are `Option`s; nothing relies on empty strings
//! standing in for NULL.

use serde::{Deserialize, Serialize};

/// Kind of relation reported by `INFORMATION_SCHEMA.TABLES.TABLE_TYPE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableType {
    /// Ordinary table (`BASE TABLE`)
    BaseTable,
    /// View (`VIEW`)
    View,
    /// Any value outside the known set
    Unknown,
}

impl TableType {
    /// Normalizes a raw `TABLE_TYPE` value. Unrecognized values map to
    /// [`TableType::Unknown`] instead of failing.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "BASE TABLE" => Self::BaseTable,
            "VIEW" => Self::View,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for TableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BaseTable => write!(f, "base table"),
            Self::View => write!(f, "view"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A table or view visible in the scanned schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Owning schema
    pub schema: String,
    /// Table or view name
    pub name: String,
    /// Normalized `TABLE_TYPE`
    pub table_type: TableType,
}

impl Table {
    /// Convenience constructor used by adapters and tests
    pub fn new(schema: impl Into<String>, name: impl Into<String>, table_type: TableType) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            table_type,
        }
    }
}

/// One column of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Schema of the owning table
    pub table_schema: String,
    /// Owning table
    pub table_name: String,
    /// Column name
    pub name: String,
    /// 1-based, unique within the table
    pub ordinal_position: u32,
    /// `COLUMN_DEFAULT`, `None` when the column has no default
    pub default_value: Option<String>,
    /// Whether `IS_NULLABLE` is `YES`
    pub is_nullable: bool,
    /// Declared type without modifiers, e.g. `varchar`
    pub data_type: String,
    /// Full type including length, precision or enum members, e.g. `varchar(255)`
    pub column_type: String,
}

/// One (constraint, column) row from `KEY_COLUMN_USAGE`.
///
/// A constraint spanning several columns appears as several rows sharing
/// `constraint_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// Constraint name; `PRIMARY` for the primary key
    pub constraint_name: String,
    /// Schema of the constrained table
    pub source_schema: String,
    /// Constrained table
    pub source_table: String,
    /// Constrained column
    pub source_column: String,
    /// Referenced schema, foreign keys only
    pub target_schema: Option<String>,
    /// Referenced table, foreign keys only
    pub target_table: Option<String>,
    /// Referenced column, foreign keys only
    pub target_column: Option<String>,
    /// `COLUMNS.EXTRA` of the source column (`auto_increment`, ...)
    pub extra: String,
    /// `COLUMNS.COLUMN_KEY` of the source column (`PRI`, `UNI`, `MUL` or empty)
    pub column_key: String,
}

/// Foreign-key edge between two tables, source first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Table holding the foreign key
    pub source_table: String,
    /// Referenced table
    pub target_table: String,
}

/// A table together with the metadata fetched for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// The table itself
    pub table: Table,
    /// Columns as fetched
    pub columns: Vec<Column>,
    /// Key usage rows as fetched
    pub constraints: Vec<Constraint>,
}

impl TableSnapshot {
    /// Columns in ordinal order, whatever order they were fetched in
    pub fn ordered_columns(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.ordinal_position);
        columns
    }
}

/// Everything read from one schema, tables in scan order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// Scanned schema
    pub schema: String,
    /// Tables in scan order
    pub tables: Vec<TableSnapshot>,
}

impl SchemaSnapshot {
    /// Creates an empty snapshot for the named schema
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            tables: Vec::new(),
        }
    }

    /// Total number of columns across all tables
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    /// Total number of constraint rows across all tables
    pub fn constraint_count(&self) -> usize {
        self.tables.iter().map(|t| t.constraints.len()).sum()
    }
}
