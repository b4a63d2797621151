/// How a statement's result is shaped, decided by its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    /// UPDATE, DELETE, DDL and everything else.
    Other,
}

impl StatementKind {
    /// Classify `sql` by its first keyword, ignoring case and leading whitespace.
    pub fn classify(sql: &str) -> Self {
        let sql = sql.trim_start();
        let end = sql
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(sql.len());
        let keyword = &sql[..end];

        if keyword.eq_ignore_ascii_case("select") {
            StatementKind::Select
        } else if keyword.eq_ignore_ascii_case("insert") {
            StatementKind::Insert
        } else {
            StatementKind::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(StatementKind::classify("SELECT 1"), StatementKind::Select);
        assert_eq!(StatementKind::classify("  \n\tselect * from t"), StatementKind::Select);
        assert_eq!(StatementKind::classify("SELECT*FROM t"), StatementKind::Select);
        assert_eq!(StatementKind::classify("Insert INTO t VALUES (1)"), StatementKind::Insert);
        assert_eq!(StatementKind::classify("UPDATE t SET x = 1"), StatementKind::Other);
        assert_eq!(StatementKind::classify("delete from t"), StatementKind::Other);
        assert_eq!(StatementKind::classify("CREATE TABLE t (id INT)"), StatementKind::Other);
        assert_eq!(StatementKind::classify(""), StatementKind::Other);
    }

    #[test]
    fn test_keyword_must_be_whole_word() {
        assert_eq!(StatementKind::classify("SELECTED"), StatementKind::Other);
        assert_eq!(StatementKind::classify("inserts"), StatementKind::Other);
    }
}
