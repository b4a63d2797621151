mod kind;
mod rewrite;

pub use kind::StatementKind;
pub use rewrite::{flatten, rewrite, MULTI_VALUE_MARKER, PLACEHOLDER};
