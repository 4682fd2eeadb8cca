//! Database adapters implementing [`MetadataSource`](crate::source::MetadataSource).
//!
//! Each adapter lives behind a cargo feature so builds only link the drivers
//! they need.

#[cfg(feature = "mysql")]
pub mod mysql;
