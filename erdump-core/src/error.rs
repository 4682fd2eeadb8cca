//! Error types for schema introspection and rendering.
//!
//! Messages never carry the database password. Connection context is built
//! from host, port and database name only.

use thiserror::Error;

/// Main error type for erdump operations.
#[derive(Debug, Error)]
pub enum ErdumpError {
    /// A required setting is missing or malformed
    #[error("Configuration error: {message}")]
    Configuration {
        /// What is missing or malformed
        message: String,
    },

    /// Database unreachable or credentials rejected
    #[error("Database connection failed: {context}")]
    Connection {
        /// What was being attempted, free of credentials
        context: String,
        /// Underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The information schema is not readable with the supplied account
    #[error("Insufficient privileges: {required}")]
    InsufficientPrivileges {
        /// The access that was refused
        required: String,
    },

    /// An introspection query failed or returned an undecodable row
    #[error("Metadata query failed: {context}")]
    Query {
        /// What was being attempted, free of credentials
        context: String,
        /// Underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        /// What was being attempted, free of credentials
        context: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Serialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        /// What was being attempted, free of credentials
        context: String,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with `ErdumpError`
pub type Result<T> = std::result::Result<T, ErdumpError>;

impl ErdumpError {
    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a connection error for the given (credential-free) target
    pub fn connection_failed<E>(target: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: target.into(),
            source: Box::new(error),
        }
    }

    /// Creates an insufficient privileges error
    pub fn insufficient_privileges(required: impl Into<String>) -> Self {
        Self::InsufficientPrivileges {
            required: required.into(),
        }
    }

    /// Creates a query error with context
    pub fn query_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Query {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a decoding error for one field of an information-schema row.
    ///
    /// # Arguments
    /// * `field_name` - Name of the result column being decoded
    /// * `table_context` - Table whose metadata was being read, if any
    /// * `error` - The underlying decode error
    pub fn parse_field<E>(field_name: &str, table_context: Option<&str>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let context = match table_context {
            Some(table) => format!(
                "Failed to parse field '{}' from result for table '{}'",
                field_name, table
            ),
            None => format!(
                "Failed to parse field '{}' from database result",
                field_name
            ),
        };
        Self::Query {
            context,
            source: Box::new(error),
        }
    }

    /// Whether this error was raised before any network activity
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = ErdumpError::configuration("DATABASE_NAME is required");
        assert!(error.to_string().contains("DATABASE_NAME is required"));
        assert!(error.is_configuration());

        let error = ErdumpError::insufficient_privileges("SELECT on INFORMATION_SCHEMA");
        assert!(error.to_string().contains("SELECT on INFORMATION_SCHEMA"));
        assert!(!error.is_configuration());
    }

    #[test]
    fn test_parse_field_context() {
        let io = std::io::Error::other("bad bytes");
        let error = ErdumpError::parse_field("COLUMN_NAME", Some("orders"), io);
        let message = error.to_string();
        assert!(message.contains("COLUMN_NAME"));
        assert!(message.contains("orders"));

        let io = std::io::Error::other("bad bytes");
        let error = ErdumpError::parse_field("TABLE_NAME", None, io);
        assert!(error.to_string().contains("from database result"));
    }

    #[test]
    fn test_connection_error_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let error = ErdumpError::connection_failed("db.internal:3306/shop", io);
        assert!(error.to_string().contains("db.internal:3306/shop"));
        assert!(error.source().is_some());
    }
}
