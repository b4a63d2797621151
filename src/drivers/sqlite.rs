use std::path::Path;

use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::ToSql;

use crate::error::{Result, SqlExecError};
use crate::traits::{DatabaseDriver, PreparedStatement};
use crate::types::{RawQueryResult, SqlValue};

/// SQLite driver implementation using rusqlite.
pub struct SqliteDriver {
    conn: rusqlite::Connection,
}

impl SqliteDriver {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = rusqlite::Connection::open(path)
            .map_err(|e| SqlExecError::ConnectionFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = rusqlite::Connection::open_in_memory()
            .map_err(|e| SqlExecError::ConnectionFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Wrap an existing rusqlite connection.
    pub fn from_connection(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// The underlying rusqlite connection.
    pub fn connection(&self) -> &rusqlite::Connection {
        &self.conn
    }
}

impl DatabaseDriver for SqliteDriver {
    fn driver_name(&self) -> &str {
        "sqlite"
    }

    fn prepare<'a>(&'a mut self, sql: &str) -> Result<Box<dyn PreparedStatement + 'a>> {
        let conn = &self.conn;
        let stmt = conn.prepare(sql).map_err(query_failed)?;
        Ok(Box::new(SqliteStatement {
            conn,
            stmt,
            sql: sql.to_string(),
            result: None,
            affected: 0,
        }))
    }
}

struct SqliteStatement<'conn> {
    conn: &'conn rusqlite::Connection,
    stmt: rusqlite::Statement<'conn>,
    sql: String,
    result: Option<RawQueryResult>,
    affected: u64,
}

impl PreparedStatement for SqliteStatement<'_> {
    fn execute(&mut self, params: &[SqlValue]) -> Result<bool> {
        let params = rusqlite::params_from_iter(params.iter());

        if self.stmt.column_count() == 0 {
            let changed = self.stmt.execute(params).map_err(query_failed)?;
            self.affected = changed as u64;
            self.result = None;
            return Ok(true);
        }

        // Statements with a result set are drained here; rusqlite rows borrow
        // the statement and cannot outlive this call.
        let columns: Vec<String> = self
            .stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let width = columns.len();

        let mut rows = self.stmt.query(params).map_err(query_failed)?;
        let mut values = Vec::new();
        while let Some(row) = rows.next().map_err(query_failed)? {
            let mut record = Vec::with_capacity(width);
            for i in 0..width {
                record.push(from_value_ref(row.get_ref(i).map_err(query_failed)?));
            }
            values.push(record);
        }

        drop(rows);

        // `changes()` still holds the previous write's count after a read-only
        // statement, so only trust it for statements that can write.
        self.affected = if self.stmt.readonly() {
            0
        } else {
            self.conn.changes()
        };
        self.result = Some(RawQueryResult::new(columns, values));
        Ok(true)
    }

    fn fetch_all(&mut self) -> Result<RawQueryResult> {
        Ok(self.result.take().unwrap_or_else(RawQueryResult::empty))
    }

    fn affected_rows(&self) -> u64 {
        self.affected
    }

    fn statement_text(&self) -> &str {
        &self.sql
    }
}

fn query_failed(e: rusqlite::Error) -> SqlExecError {
    SqlExecError::QueryFailed(e.to_string())
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            SqlValue::Int32(i) => ToSqlOutput::Owned(Value::Integer(i64::from(*i))),
            SqlValue::Int64(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            SqlValue::Float(f) => ToSqlOutput::Owned(Value::Real(*f)),
            // SQLite has no boolean storage class
            SqlValue::Bool(b) => ToSqlOutput::Owned(Value::Integer(i64::from(*b))),
            SqlValue::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

fn from_value_ref(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(i) => SqlValue::Int64(i),
        ValueRef::Real(f) => SqlValue::Float(f),
        // SQLite does not validate TEXT; keep undecodable bytes intact
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => SqlValue::Text(text.to_string()),
            Err(_) => SqlValue::Blob(bytes.to_vec()),
        },
        ValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
    }
}
