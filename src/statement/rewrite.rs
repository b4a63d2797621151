use std::borrow::Cow;

use crate::types::{Binding, SqlValue};

/// Shorthand marker standing for "as many placeholders as the list binding has values".
pub const MULTI_VALUE_MARKER: &str = "(...)";

/// Single positional placeholder.
pub const PLACEHOLDER: &str = "?";

/// Expands each `(...)` marker into one placeholder per value of the matching
/// list binding.
///
/// List bindings consume markers left to right, one marker each. Scalar and raw
/// bindings consume nothing. Markers left over once the lists run out are kept
/// verbatim for the driver to reject.
///
/// ```
/// use sqlexec::statement::rewrite;
/// use sqlexec::Binding;
///
/// let sql = rewrite(
///     "SELECT * FROM t WHERE a = ? AND id IN (...)",
///     &[Binding::from(7), Binding::list([1, 2, 3])],
/// );
/// assert_eq!(sql, "SELECT * FROM t WHERE a = ? AND id IN (?, ?, ?)");
/// ```
pub fn rewrite<'a>(sql: &'a str, bindings: &[Binding]) -> Cow<'a, str> {
    if !sql.contains(MULTI_VALUE_MARKER) {
        return Cow::Borrowed(sql);
    }

    let mut out = String::with_capacity(sql.len() + 8);
    let mut rest = sql;

    for values in bindings.iter().filter_map(|b| match b {
        Binding::List(values) => Some(values),
        _ => None,
    }) {
        let Some(at) = rest.find(MULTI_VALUE_MARKER) else {
            break;
        };
        out.push_str(&rest[..at]);
        push_group(&mut out, values.len());
        rest = &rest[at + MULTI_VALUE_MARKER.len()..];
    }

    out.push_str(rest);
    Cow::Owned(out)
}

fn push_group(out: &mut String, n: usize) {
    out.push('(');
    for i in 0..n {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(PLACEHOLDER);
    }
    out.push(')');
}

/// Flattens bindings into the positional parameter list sent to the driver.
///
/// List values are spliced in place, in the same order [`rewrite`] expands
/// markers. Raw expressions are dropped.
pub fn flatten(bindings: &[Binding]) -> Vec<SqlValue> {
    let mut params = Vec::with_capacity(bindings.len());
    for binding in bindings {
        match binding {
            Binding::Value(v) => params.push(v.clone()),
            Binding::List(values) => params.extend(values.iter().cloned()),
            Binding::Raw(_) => {}
        }
    }
    params
}
