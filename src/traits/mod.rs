mod driver;
mod grammar;

pub use driver::{DatabaseDriver, PreparedStatement};
pub use grammar::Grammar;
