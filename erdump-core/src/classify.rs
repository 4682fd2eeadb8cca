//! Constraint classification.
//!
//! Independent predicates over [`Constraint`] rows. A row may satisfy several
//! of them at once (a primary key column is often also auto-increment).
//! Nothing here mutates its input; classification happens at render time.

use crate::models::{Column, Constraint};

/// Constraint name MySQL reserves for the primary key
pub const PRIMARY_KEY_NAME: &str = "PRIMARY";
/// `COLUMN_KEY` marker for a unique index
pub const UNIQUE_KEY_MARKER: &str = "UNI";
/// `EXTRA` value for an auto-increment column
pub const AUTO_INCREMENT_MARKER: &str = "auto_increment";

/// True iff the row references another table and column.
pub const fn is_foreign_key(constraint: &Constraint) -> bool {
    constraint.target_table.is_some() && constraint.target_column.is_some()
}

/// True iff the row belongs to the primary key.
pub fn is_primary_key(constraint: &Constraint) -> bool {
    constraint.constraint_name == PRIMARY_KEY_NAME
}

/// True iff any row sharing this constraint's name carries the unique marker.
///
/// # Arguments
/// * `constraint` - Row to classify
/// * `all_for_table` - Every constraint row of the same table
pub fn is_unique(constraint: &Constraint, all_for_table: &[Constraint]) -> bool {
    all_for_table.iter().any(|sibling| {
        sibling.constraint_name == constraint.constraint_name
            && sibling.column_key == UNIQUE_KEY_MARKER
    })
}

/// True iff the source column is auto-increment.
pub fn is_auto_increment(constraint: &Constraint) -> bool {
    constraint.extra == AUTO_INCREMENT_MARKER
}

/// Key roles of a single column, folded over its constraint rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnKeys {
    /// Part of the primary key
    pub primary: bool,
    /// Source of a foreign key
    pub foreign: bool,
    /// Covered by a unique index
    pub unique: bool,
    /// Auto-increment column
    pub auto_increment: bool,
}

impl ColumnKeys {
    /// True when no role applies
    pub const fn is_empty(&self) -> bool {
        !(self.primary || self.foreign || self.unique || self.auto_increment)
    }
}

/// Classifies every constraint row whose source is `column`.
pub fn column_keys(column: &Column, constraints: &[Constraint]) -> ColumnKeys {
    constraints
        .iter()
        .filter(|c| c.source_column == column.name)
        .fold(ColumnKeys::default(), |keys, c| ColumnKeys {
            primary: keys.primary || is_primary_key(c),
            foreign: keys.foreign || is_foreign_key(c),
            unique: keys.unique || is_unique(c, constraints),
            auto_increment: keys.auto_increment || is_auto_increment(c),
        })
}
