use crate::traits::Grammar;

/// MySQL and MariaDB.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MySqlGrammar;

/// PostgreSQL.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PostgresGrammar;

/// SQLite.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SqliteGrammar;

/// Microsoft SQL Server.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SqlServerGrammar;

/// Fallback for dialects without a dedicated grammar.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenericGrammar;

impl Grammar for MySqlGrammar {
    fn dialect(&self) -> &'static str {
        "mysql"
    }
}

impl Grammar for PostgresGrammar {
    fn dialect(&self) -> &'static str {
        "pgsql"
    }
}

impl Grammar for SqliteGrammar {
    fn dialect(&self) -> &'static str {
        "sqlite"
    }
}

impl Grammar for SqlServerGrammar {
    fn dialect(&self) -> &'static str {
        "sqlsrv"
    }
}

impl Grammar for GenericGrammar {
    fn dialect(&self) -> &'static str {
        "generic"
    }
}
