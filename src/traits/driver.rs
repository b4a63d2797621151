use crate::error::Result;
use crate::types::{RawQueryResult, SqlValue};

/// Trait for native database driver handles.
/// Drivers are responsible for:
/// - Preparing statements that use `?` positional placeholders
/// - Converting SqlValue parameters to native types
/// - Reporting a dialect name used to pick a grammar
///
/// Every call is a single blocking round trip.
pub trait DatabaseDriver {
    /// The dialect name this driver speaks, e.g. `sqlite` or `pgsql`.
    fn driver_name(&self) -> &str;

    /// Prepare a statement for execution.
    fn prepare<'a>(&'a mut self, sql: &str) -> Result<Box<dyn PreparedStatement + 'a>>;
}

/// A statement prepared on a driver handle.
pub trait PreparedStatement {
    /// Bind `params` positionally and execute. Returns the driver's success flag.
    fn execute(&mut self, params: &[SqlValue]) -> Result<bool>;

    /// Takes every row produced by the last execution.
    fn fetch_all(&mut self) -> Result<RawQueryResult>;

    /// Number of rows changed by the last execution.
    fn affected_rows(&self) -> u64;

    /// The SQL text this statement was prepared from.
    fn statement_text(&self) -> &str;
}

impl<D: DatabaseDriver + ?Sized> DatabaseDriver for Box<D> {
    fn driver_name(&self) -> &str {
        (**self).driver_name()
    }

    fn prepare<'a>(&'a mut self, sql: &str) -> Result<Box<dyn PreparedStatement + 'a>> {
        (**self).prepare(sql)
    }
}
