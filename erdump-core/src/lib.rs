//! Schema introspection and PlantUML rendering for erdump.
//!
//! The crate reads table, column and key-usage metadata from a database's
//! information schema and renders it as a PlantUML entity-relationship
//! diagram.
//!
//! # Security Guarantees
//! - All database operations are read-only
//! - Identifiers are bound as query parameters
//! - Passwords are zeroized on drop and never logged
//!
//! # Architecture
//! - [`source::MetadataSource`] abstracts the database so the pipeline runs
//!   against a live pool or an in-memory fake
//! - [`classify`] holds the constraint predicates
//! - [`render`] turns a [`models::SchemaSnapshot`] into text
//! - [`pipeline`] sequences the reads table by table

pub mod adapters;
pub mod classify;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use config::DatabaseConfig;
pub use error::{ErdumpError, Result};
pub use logging::init_logging;
pub use models::{
    Column, Constraint, Relationship, SchemaSnapshot, Table, TableSnapshot, TableType,
};
pub use pipeline::{collect_snapshot, generate_diagram};
pub use render::{OutputFormat, RenderOptions};
pub use source::MetadataSource;

#[cfg(feature = "mysql")]
pub use adapters::mysql::MySqlSource;
