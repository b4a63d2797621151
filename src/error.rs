use thiserror::Error;

use crate::types::Binding;

/// Error type for sqlexec operations
#[derive(Debug, Error)]
pub enum SqlExecError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Native failure reported by a driver.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A statement could not be prepared or executed.
    #[error("Query execution failed: {detail} (SQL: {sql})")]
    QueryExecution {
        sql: String,
        bindings: Vec<Binding>,
        detail: String,
    },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for sqlexec operations
pub type Result<T> = std::result::Result<T, SqlExecError>;
