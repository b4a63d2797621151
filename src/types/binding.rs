use super::SqlValue;

/// A positional binding supplied alongside raw SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// A literal value sent to the driver as one parameter.
    Value(SqlValue),
    /// An expression the caller already interpolated into the SQL text.
    /// Never sent to the driver.
    Raw(String),
    /// A sequence of literal values filling one `(...)` marker.
    List(Vec<SqlValue>),
}

impl Binding {
    /// Creates a raw expression marker.
    pub fn raw(expression: impl Into<String>) -> Self {
        Binding::Raw(expression.into())
    }

    /// Creates a multi-value binding from any sequence of values.
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        Binding::List(values.into_iter().map(Into::into).collect())
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Binding::Raw(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Binding::List(_))
    }
}

impl From<SqlValue> for Binding {
    fn from(value: SqlValue) -> Self {
        Binding::Value(value)
    }
}

macro_rules! impl_binding_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Binding {
                fn from(value: $ty) -> Self {
                    Binding::Value(SqlValue::from(value))
                }
            }
        )*
    };
}

impl_binding_from!(&str, String, i32, i64, f64, bool, Vec<u8>);

impl<T: Into<SqlValue>> From<Option<T>> for Binding {
    fn from(value: Option<T>) -> Self {
        Binding::Value(value.into())
    }
}
