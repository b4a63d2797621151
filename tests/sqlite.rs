use sqlexec::drivers::SqliteDriver;
use sqlexec::{Binding, Connection, ConnectionConfig, QueryResult, SqlExecError, SqlValue};
use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// Helper function to create an in-memory database for testing
fn create_test_db() -> Connection<SqliteDriver> {
    init_logging();
    let driver = SqliteDriver::open_in_memory().unwrap();
    let mut conn = Connection::new(driver, ConnectionConfig::default());
    initialize_schema(&mut conn);
    conn
}

// Initialize the database schema
fn initialize_schema(conn: &mut Connection<SqliteDriver>) {
    conn.execute(
        r#"
        CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            age INTEGER
        )
        "#,
        &[],
    )
    .unwrap();
}

fn insert_user(conn: &mut Connection<SqliteDriver>, name: &str, email: &str, age: Option<i32>) {
    let result = conn
        .execute(
            "INSERT INTO users (name, email, age) VALUES (?, ?, ?)",
            &[name.into(), email.into(), age.into()],
        )
        .unwrap();
    assert_eq!(result, QueryResult::Inserted(true));
}

#[test]
fn test_basic_operations() {
    let mut conn = create_test_db();

    insert_user(&mut conn, "John Doe", "john@example.com", Some(30));

    let user = conn
        .query_first_row(
            "SELECT id, name, email, age FROM users WHERE email = ?",
            &["john@example.com".into()],
        )
        .unwrap()
        .unwrap();
    assert_eq!(user.columns(), ["id", "name", "email", "age"]);
    assert_eq!(user.get("name").unwrap(), &SqlValue::from("John Doe"));
    assert_eq!(user.get("age").unwrap(), &SqlValue::Int64(30));

    let updated = conn
        .execute("UPDATE users SET age = ? WHERE id = ?", &[31.into(), 1.into()])
        .unwrap();
    assert_eq!(updated, QueryResult::Affected(1));

    let age = conn
        .query_scalar("SELECT age FROM users WHERE id = ?", &[1.into()])
        .unwrap();
    assert_eq!(age, Some(SqlValue::Int64(31)));

    let deleted = conn.execute("DELETE FROM users WHERE id = ?", &[1.into()]).unwrap();
    assert_eq!(deleted, QueryResult::Affected(1));

    let missing = conn
        .query_first_row("SELECT id FROM users WHERE id = ?", &[1.into()])
        .unwrap();
    assert!(missing.is_none());
}

#[test]
fn test_in_list_expansion() {
    let mut conn = create_test_db();
    insert_user(&mut conn, "Ann", "ann@example.com", Some(20));
    insert_user(&mut conn, "Ben", "ben@example.com", None);
    insert_user(&mut conn, "Cid", "cid@example.com", Some(40));

    let rows = conn
        .query_rows(
            "SELECT name FROM users WHERE name IN (...) AND id > ? ORDER BY id",
            &[Binding::list(["Ann", "Cid", "Zed"]), 0.into()],
        )
        .unwrap();
    let names: Vec<&SqlValue> = rows.iter().map(|r| r.first().unwrap()).collect();
    assert_eq!(names, [&SqlValue::from("Ann"), &SqlValue::from("Cid")]);

    let updated = conn
        .execute(
            "UPDATE users SET age = age + ? WHERE id IN (...)",
            &[1.into(), Binding::list([1, 2, 3])],
        )
        .unwrap();
    // NULL + 1 stays NULL but the row still counts as changed
    assert_eq!(updated, QueryResult::Affected(3));
}

#[test]
fn test_raw_expression_in_sql_text() {
    let mut conn = create_test_db();
    insert_user(&mut conn, "Ann", "ann@example.com", Some(20));

    let value = conn
        .query_scalar(
            "SELECT upper(name) FROM users WHERE email = ?",
            &[Binding::raw("upper(name)"), "ann@example.com".into()],
        )
        .unwrap();
    assert_eq!(value, Some(SqlValue::from("ANN")));
}

#[test]
fn test_aggregate_scalar_on_empty_table() {
    let mut conn = create_test_db();

    let count = conn.query_scalar("SELECT COUNT(*) FROM users", &[]).unwrap();
    assert_eq!(count, Some(SqlValue::Int64(0)));

    let none = conn.query_scalar("SELECT name FROM users WHERE 0=1", &[]).unwrap();
    assert_eq!(none, None);
}

#[test]
fn test_constraint_violation_is_query_execution_error() {
    let mut conn = create_test_db();
    insert_user(&mut conn, "Ann", "ann@example.com", None);

    let err = conn
        .execute(
            "INSERT INTO users (name, email) VALUES (?, ?)",
            &["Ann again".into(), "ann@example.com".into()],
        )
        .unwrap_err();
    match err {
        SqlExecError::QueryExecution { detail, bindings, .. } => {
            assert!(detail.contains("UNIQUE"), "unexpected detail: {detail}");
            assert_eq!(bindings.len(), 2);
        }
        other => panic!("Expected QueryExecution error, got {other:?}"),
    }

    // Both inserts and the schema statement were logged
    assert_eq!(conn.query_log().len(), 3);
}

#[test]
fn test_prepare_failure_is_logged() {
    let mut conn = create_test_db();

    let err = conn.execute("SELECT * FROM nowhere", &[]).unwrap_err();
    assert!(matches!(err, SqlExecError::QueryExecution { ref sql, .. } if sql == "SELECT * FROM nowhere"));
    assert_eq!(conn.query_log().last().unwrap().sql, "SELECT * FROM nowhere");
}

#[test]
fn test_grammar_from_sqlite_driver() {
    let conn = create_test_db();
    assert_eq!(conn.grammar().dialect(), "sqlite");
}

#[test]
fn test_file_database_persists() {
    let temp_file = NamedTempFile::new().unwrap();

    {
        let mut conn = Connection::new(
            SqliteDriver::open(temp_file.path()).unwrap(),
            ConnectionConfig::default(),
        );
        initialize_schema(&mut conn);
        insert_user(&mut conn, "Dee", "dee@example.com", Some(50));
    }

    let mut conn = Connection::new(
        SqliteDriver::open(temp_file.path()).unwrap(),
        ConnectionConfig::default(),
    );
    let name = conn
        .query_scalar("SELECT name FROM users WHERE age = ?", &[50.into()])
        .unwrap();
    assert_eq!(name, Some(SqlValue::from("Dee")));
}

#[test]
fn test_returning_statements_report_affected_rows() {
    let mut conn = create_test_db();
    insert_user(&mut conn, "Ann", "ann@example.com", Some(20));
    insert_user(&mut conn, "Ben", "ben@example.com", Some(30));
    insert_user(&mut conn, "Cid", "cid@example.com", Some(40));

    let updated = conn
        .execute("UPDATE users SET age = age + ? RETURNING age", &[10.into()])
        .unwrap();
    assert_eq!(updated, QueryResult::Affected(3));

    let deleted = conn
        .execute("DELETE FROM users WHERE age > ? RETURNING id", &[35.into()])
        .unwrap();
    assert_eq!(deleted, QueryResult::Affected(2));

    // A read right after a write must not report the write's count
    let read = conn.execute("WITH u AS (SELECT id FROM users) SELECT id FROM u", &[]).unwrap();
    assert!(matches!(read, QueryResult::Affected(0)));
}
