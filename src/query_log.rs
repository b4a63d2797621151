use crate::types::Binding;

/// One recorded execution attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryLogEntry {
    /// SQL text after marker expansion.
    pub sql: String,
    /// Bindings handed to the driver, raw expressions already removed.
    pub bindings: Vec<Binding>,
}

/// Append-only record of every statement a connection attempted to run.
///
/// Entries record intent, not outcome: a statement the driver rejects is
/// still logged. The log never evicts on its own.
#[derive(Debug, Default, Clone)]
pub struct QueryLog {
    entries: Vec<QueryLogEntry>,
}

impl QueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sql: impl Into<String>, bindings: Vec<Binding>) {
        self.entries.push(QueryLogEntry {
            sql: sql.into(),
            bindings,
        });
    }

    /// All entries in the order they were recorded.
    pub fn entries(&self) -> &[QueryLogEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&QueryLogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<QueryLogEntry> {
        self.entries
    }
}
