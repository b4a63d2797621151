use std::fmt::Debug;

/// A dialect policy object handed to query builders.
/// Grammars are stateless; one instance is resolved per connection.
pub trait Grammar: Debug + Send + Sync {
    /// The dialect this grammar compiles for.
    fn dialect(&self) -> &'static str;
}
