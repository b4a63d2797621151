use std::sync::Arc;

use crate::error::{Result, SqlExecError};
use crate::types::SqlValue;

/// Driver-agnostic raw outcome of executing a prepared statement.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQueryResult {
    /// Column names in order
    pub columns: Vec<String>,
    /// Rows, where each row is a vector of values in column order
    pub rows: Vec<Vec<SqlValue>>,
    /// Number of rows changed by a write statement
    pub affected_rows: u64,
}

impl RawQueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self {
            columns,
            rows,
            affected_rows: 0,
        }
    }

    /// Creates a result for a statement that returned no rows but changed `n`.
    pub fn affected(n: u64) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            affected_rows: n,
        }
    }

    pub fn empty() -> Self {
        Self::affected(0)
    }

    /// Converts the raw rows into `Row`s sharing one column list.
    pub fn into_rows(self) -> Vec<Row> {
        let columns: Arc<[String]> = self.columns.into();
        self.rows
            .into_iter()
            .map(|values| Row::new(Arc::clone(&columns), values))
            .collect()
    }
}

/// A single row result from a query.
/// Values keep the column order declared by the statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<SqlValue>,
}

impl Row {
    /// Creates a new Row from column names and values.
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<SqlValue>) -> Self {
        Self { columns, values }
    }

    /// Gets a value by column name.
    pub fn get(&self, column: &str) -> Result<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
            .ok_or_else(|| SqlExecError::ColumnNotFound(column.to_string()))
    }

    /// Gets a value by its position in the select list.
    pub fn get_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    /// Returns the value of the first column, if any.
    pub fn first(&self) -> Option<&SqlValue> {
        self.values.first()
    }

    /// Returns all column names in this row, in declared order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Iterates over `(column, value)` pairs in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }

    /// Returns the number of columns in this row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Result of executing a statement, shaped by its leading keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// `SELECT`: every fetched row, possibly none.
    Rows(Vec<Row>),
    /// `INSERT`: the driver's execution-success flag.
    Inserted(bool),
    /// Anything else: number of rows affected.
    Affected(u64),
}

impl QueryResult {
    /// Returns the rows of a `SELECT`, or `None` for write results.
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            QueryResult::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    /// Consumes the result, returning its rows. Write results yield no rows.
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            QueryResult::Rows(rows) => rows,
            _ => Vec::new(),
        }
    }

    /// Consumes the result, returning the first row if there is one.
    pub fn into_first_row(self) -> Option<Row> {
        self.into_rows().into_iter().next()
    }

    pub fn inserted(&self) -> Option<bool> {
        match self {
            QueryResult::Inserted(ok) => Some(*ok),
            _ => None,
        }
    }

    pub fn affected_rows(&self) -> Option<u64> {
        match self {
            QueryResult::Affected(n) => Some(*n),
            _ => None,
        }
    }
}
