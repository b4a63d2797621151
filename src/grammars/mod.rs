//! Grammar selection.
//!
//! Grammars are looked up by dialect key in a [`GrammarRegistry`]. The registry
//! is open: callers may register factories for dialects the crate does not
//! know about, and unknown keys resolve to [`GenericGrammar`].

mod dialects;

use std::collections::HashMap;
use std::sync::Arc;

pub use dialects::{GenericGrammar, MySqlGrammar, PostgresGrammar, SqlServerGrammar, SqliteGrammar};

use crate::traits::Grammar;

/// Builds a fresh grammar instance.
pub type GrammarFactory = fn() -> Arc<dyn Grammar>;

/// Maps dialect keys to grammar factories. Keys are case-insensitive.
#[derive(Debug, Clone)]
pub struct GrammarRegistry {
    factories: HashMap<String, GrammarFactory>,
    fallback: GrammarFactory,
}

impl GrammarRegistry {
    /// Creates a registry with no dialects; every key resolves to the fallback.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
            fallback: || Arc::new(GenericGrammar),
        }
    }

    /// Register a factory under `key`, replacing any existing entry.
    pub fn register(&mut self, key: &str, factory: GrammarFactory) -> &mut Self {
        self.factories.insert(key.to_ascii_lowercase(), factory);
        self
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with(mut self, key: &str, factory: GrammarFactory) -> Self {
        self.register(key, factory);
        self
    }

    /// Replace the grammar used for unrecognized keys.
    pub fn with_fallback(mut self, factory: GrammarFactory) -> Self {
        self.fallback = factory;
        self
    }

    /// Returns true if `key` has a dedicated grammar.
    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(&key.to_ascii_lowercase())
    }

    /// Instantiate the grammar for `key`, falling back for unknown keys.
    pub fn resolve(&self, key: &str) -> Arc<dyn Grammar> {
        match self.factories.get(&key.to_ascii_lowercase()) {
            Some(factory) => factory(),
            None => {
                tracing::warn!(dialect = key, "no grammar registered for dialect, using fallback");
                (self.fallback)()
            }
        }
    }
}

impl Default for GrammarRegistry {
    fn default() -> Self {
        Self::empty()
            .with("mysql", || Arc::new(MySqlGrammar))
            .with("mariadb", || Arc::new(MySqlGrammar))
            .with("pgsql", || Arc::new(PostgresGrammar))
            .with("postgres", || Arc::new(PostgresGrammar))
            .with("postgresql", || Arc::new(PostgresGrammar))
            .with("sqlite", || Arc::new(SqliteGrammar))
            .with("sqlsrv", || Arc::new(SqlServerGrammar))
            .with("mssql", || Arc::new(SqlServerGrammar))
    }
}
