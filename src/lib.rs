//! sqlexec - A driver-agnostic raw SQL execution layer
//!
//! # Example
//! ```
//! use sqlexec::drivers::SqliteDriver;
//! use sqlexec::{Binding, Connection, ConnectionConfig, QueryResult, SqlValue};
//!
//! let driver = SqliteDriver::open_in_memory()?;
//! let mut conn = Connection::new(driver, ConnectionConfig::default());
//!
//! conn.execute("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)", &[])?;
//! let inserted = conn.execute(
//!     "INSERT INTO users (name) VALUES (?), (?)",
//!     &["John".into(), "Jane".into()],
//! )?;
//! assert_eq!(inserted, QueryResult::Inserted(true));
//!
//! // `(...)` expands to one placeholder per value of a list binding
//! let count = conn.query_scalar(
//!     "SELECT COUNT(*) FROM users WHERE name IN (...)",
//!     &[Binding::list(["John", "Jane", "Jim"])],
//! )?;
//! assert_eq!(count, Some(SqlValue::Int64(2)));
//! # Ok::<(), sqlexec::SqlExecError>(())
//! ```

pub mod config;
pub mod drivers;
pub mod error;
pub mod grammars;
pub mod query_log;
pub mod statement;
pub mod traits;
pub mod types;

mod connection;
mod table;

// Re-export main types for convenient access
pub use config::ConnectionConfig;
pub use connection::Connection;
pub use error::{Result, SqlExecError};
pub use grammars::GrammarRegistry;
pub use query_log::{QueryLog, QueryLogEntry};
pub use statement::StatementKind;
pub use table::TableQuery;
pub use traits::{DatabaseDriver, Grammar, PreparedStatement};
pub use types::{Binding, QueryResult, RawQueryResult, Row, SqlValue};
