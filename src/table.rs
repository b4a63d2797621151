use std::sync::Arc;

use crate::connection::Connection;
use crate::error::Result;
use crate::traits::{DatabaseDriver, Grammar};
use crate::types::{Binding, QueryResult, Row, SqlValue};

/// A query scoped to one table.
/// Created by [`Connection::table`] and handed to a query builder, which
/// compiles SQL with the grammar and runs it through the connection.
pub struct TableQuery<'c, D: DatabaseDriver> {
    connection: &'c mut Connection<D>,
    table: String,
    grammar: Arc<dyn Grammar>,
}

impl<'c, D: DatabaseDriver> TableQuery<'c, D> {
    pub(crate) fn new(
        connection: &'c mut Connection<D>,
        table: String,
        grammar: Arc<dyn Grammar>,
    ) -> Self {
        Self {
            connection,
            table,
            grammar,
        }
    }

    /// The table this query targets.
    pub fn name(&self) -> &str {
        &self.table
    }

    /// The connection's grammar.
    pub fn grammar(&self) -> &Arc<dyn Grammar> {
        &self.grammar
    }

    pub fn connection(&mut self) -> &mut Connection<D> {
        &mut *self.connection
    }

    pub fn execute(&mut self, sql: &str, bindings: &[Binding]) -> Result<QueryResult> {
        self.connection.execute(sql, bindings)
    }

    pub fn query_first_row(&mut self, sql: &str, bindings: &[Binding]) -> Result<Option<Row>> {
        self.connection.query_first_row(sql, bindings)
    }

    pub fn query_scalar(&mut self, sql: &str, bindings: &[Binding]) -> Result<Option<SqlValue>> {
        self.connection.query_scalar(sql, bindings)
    }
}
