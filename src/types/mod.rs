mod binding;
mod row;
mod sql_value;

pub use binding::Binding;
pub use row::{QueryResult, RawQueryResult, Row};
pub use sql_value::SqlValue;
