use rusqlite::Connection;
use studentbook_core::{KvError, KvStore, SqliteKvStore, DEFAULT_STORAGE_KEY, KV_SCHEMA_VERSION};

#[test]
fn fresh_file_gets_kv_entries_and_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studentbook.sqlite3");

    let store = SqliteKvStore::open(&path).unwrap();

    assert_eq!(user_version(store.connection()), KV_SCHEMA_VERSION);
    assert_eq!(kv_entries_columns(store.connection()), ["key", "value", "updated_at"]);
}

#[test]
fn reopen_keeps_values_and_does_not_rerun_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studentbook.sqlite3");

    SqliteKvStore::open(&path)
        .unwrap()
        .set(DEFAULT_STORAGE_KEY, "[]")
        .unwrap();

    let reopened = SqliteKvStore::open(&path).unwrap();
    assert_eq!(user_version(reopened.connection()), KV_SCHEMA_VERSION);
    assert_eq!(
        reopened.get(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn file_from_newer_build_is_rejected_and_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match SqliteKvStore::open(&path) {
        Err(KvError::UnsupportedSchemaVersion { found, supported }) => {
            assert_eq!(found, 999);
            assert_eq!(supported, KV_SCHEMA_VERSION);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("newer schema version must be rejected"),
    }

    let conn = Connection::open(&path).unwrap();
    assert_eq!(user_version(&conn), 999);
    assert!(kv_entries_columns(&conn).is_empty());
}

#[test]
fn unversioned_file_is_upgraded_and_accepts_upserts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE TABLE unrelated (id INTEGER PRIMARY KEY);")
        .unwrap();
    drop(conn);

    let store = SqliteKvStore::open(&path).unwrap();
    store.set(DEFAULT_STORAGE_KEY, "[]").unwrap();
    store.set(DEFAULT_STORAGE_KEY, r#"[{"id":"1","name":"Budi","class":"X","major":"TKJ"}]"#)
        .unwrap();

    assert_eq!(user_version(store.connection()), KV_SCHEMA_VERSION);
    let rows: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
    assert!(store
        .get(DEFAULT_STORAGE_KEY)
        .unwrap()
        .unwrap()
        .contains("Budi"));
}

fn user_version(conn: &Connection) -> u32 {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap()
}

fn kv_entries_columns(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info('kv_entries') ORDER BY cid;")
        .unwrap();
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    columns
}
