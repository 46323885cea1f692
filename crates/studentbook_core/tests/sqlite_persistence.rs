use studentbook_core::{
    KvStore, KvStudentRepository, SqliteKvStore, StudentDraft, StudentRepository,
    DEFAULT_STORAGE_KEY,
};

#[test]
fn students_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studentbook.sqlite3");

    let (budi, sari) = {
        let repo = KvStudentRepository::new(SqliteKvStore::open(&path).unwrap());
        let budi = repo
            .create_student(StudentDraft::new("Budi", "X", "TKJ"))
            .unwrap();
        let mut sari = repo
            .create_student(StudentDraft::new("Sari", "XI", "PPLG"))
            .unwrap();
        sari.class = "XII".to_string();
        repo.update_student(&sari).unwrap();
        (budi, sari)
    };

    let repo = KvStudentRepository::new(SqliteKvStore::open(&path).unwrap());
    assert_eq!(repo.list_students().unwrap(), vec![budi.clone(), sari.clone()]);

    repo.delete_student(&budi.id).unwrap();
    drop(repo);

    let repo = KvStudentRepository::new(SqliteKvStore::open(&path).unwrap());
    assert_eq!(repo.list_students().unwrap(), vec![sari]);
}

#[test]
fn collection_is_stored_as_single_row() {
    let repo = KvStudentRepository::new(SqliteKvStore::open_in_memory().unwrap());
    for name in ["A", "B", "C"] {
        repo.create_student(StudentDraft::new(name, "X", "TKJ"))
            .unwrap();
    }

    let conn = repo.store().connection();
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);

    let blob = repo.store().get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(3));
}

#[test]
fn corrupt_row_degrades_to_empty_list() {
    let store = SqliteKvStore::open_in_memory().unwrap();
    store.set(DEFAULT_STORAGE_KEY, "[1, 2, 3]").unwrap();
    let repo = KvStudentRepository::new(store);

    assert!(repo.list_students().unwrap().is_empty());
    assert_eq!(repo.degraded_reads(), 1);
}
