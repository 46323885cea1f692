//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the student roster CRUD to Dart via FRB.
//! - Route every call through one process-wide single-writer store.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported in response envelopes (`ok=false` + message),
//!   never as thrown errors.
//! - A failed mutation reports `ok=false`; the UI must not apply it locally.

use log::error;
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use studentbook_core::{
    core_version as core_version_inner, default_log_level, init_logging as init_logging_inner,
    ping as ping_inner, KvStudentRepository, SqliteKvStore, StoreHandle, StoreWriter, Student, StudentDraft,
};

const STORE_DB_FILE_NAME: &str = "studentbook.sqlite3";
const STORE_DB_PATH_ENV: &str = "STUDENTBOOK_DB_PATH";
static STORE_WRITER: OnceCell<StoreWriter> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive); blank
///   picks `debug` in debug builds and `info` in release builds.
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = match level.trim() {
        "" => default_log_level(),
        explicit => explicit,
    };
    match init_logging_inner(level, log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Student row shaped for list cards and the edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentItem {
    /// Stable student ID.
    pub id: String,
    pub name: String,
    /// Grade/section label (`class` is reserved in Dart).
    pub student_class: String,
    pub major: String,
    /// Avatar label derived from `name`.
    pub initials: String,
}

/// Response envelope for list queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentListResponse {
    pub ok: bool,
    /// Students in insertion order; empty on failure.
    pub items: Vec<StudentItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Response envelope for single-student actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected student when the action returns one.
    pub student: Option<StudentItem>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl StudentActionResponse {
    fn success(message: impl Into<String>, student: Option<StudentItem>) -> Self {
        Self {
            ok: true,
            student,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            student: None,
            message: message.into(),
        }
    }
}

/// Lists all students in insertion order.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Unreadable stored data is reported as an empty list with `ok=true`.
#[flutter_rust_bridge::frb(sync)]
pub fn student_list() -> StudentListResponse {
    match with_store(|store| store.list_students().map_err(|err| err.to_string())) {
        Ok(students) => {
            let items = students.iter().map(to_student_item).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No students yet.".to_string()
            } else {
                format!("{} student(s).", items.len())
            };
            StudentListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => StudentListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("student_list failed: {err}"),
        },
    }
}

/// Loads one student for the edit form.
#[flutter_rust_bridge::frb(sync)]
pub fn student_get(id: String) -> StudentActionResponse {
    match with_store(|store| store.get_student(id.trim()).map_err(|err| err.to_string())) {
        Ok(Some(student)) => {
            StudentActionResponse::success("Student found.", Some(to_student_item(&student)))
        }
        Ok(None) => StudentActionResponse::failure("Student not found."),
        Err(err) => StudentActionResponse::failure(format!("student_get failed: {err}")),
    }
}

/// Creates a student from the add form.
///
/// # FFI contract
/// - Blank fields are rejected with `ok=false`.
/// - Returns the created student including its assigned ID.
#[flutter_rust_bridge::frb(sync)]
pub fn student_create(name: String, student_class: String, major: String) -> StudentActionResponse {
    let draft = StudentDraft::new(name, student_class, major);
    match with_store(|store| store.create_student(draft).map_err(|err| err.to_string())) {
        Ok(student) => {
            StudentActionResponse::success("Student created.", Some(to_student_item(&student)))
        }
        Err(err) => StudentActionResponse::failure(format!("student_create failed: {err}")),
    }
}

/// Saves the edit form for an existing student.
///
/// An ID that no longer exists is accepted and changes nothing.
#[flutter_rust_bridge::frb(sync)]
pub fn student_update(
    id: String,
    name: String,
    student_class: String,
    major: String,
) -> StudentActionResponse {
    let student = Student::from_draft(id.trim(), StudentDraft::new(name, student_class, major));
    match with_store(|store| store.update_student(student).map_err(|err| err.to_string())) {
        Ok(()) => StudentActionResponse::success("Student saved.", None),
        Err(err) => StudentActionResponse::failure(format!("student_update failed: {err}")),
    }
}

/// Deletes a student after UI confirmation. Unknown IDs are a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn student_delete(id: String) -> StudentActionResponse {
    match with_store(|store| store.delete_student(id.trim()).map_err(|err| err.to_string())) {
        Ok(()) => StudentActionResponse::success("Student deleted.", None),
        Err(err) => StudentActionResponse::failure(format!("student_delete failed: {err}")),
    }
}

/// Removes every student after the UI's "reset roster" confirmation.
#[flutter_rust_bridge::frb(sync)]
pub fn student_clear() -> StudentActionResponse {
    match with_store(|store| store.clear_students().map_err(|err| err.to_string())) {
        Ok(()) => StudentActionResponse::success("All students removed.", None),
        Err(err) => StudentActionResponse::failure(format!("student_clear failed: {err}")),
    }
}

fn resolve_store_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var(STORE_DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(STORE_DB_FILE_NAME)
}

fn with_store<T>(f: impl FnOnce(&StoreHandle) -> Result<T, String>) -> Result<T, String> {
    let writer = STORE_WRITER.get_or_try_init(|| {
        let db_path = resolve_store_db_path();
        let store = SqliteKvStore::open(&db_path).map_err(|err| {
            error!(
                "event=store_open module=ffi status=error error_code=db_open_failed error={err}"
            );
            format!("student store open failed: {err}")
        })?;
        StoreWriter::spawn(KvStudentRepository::new(store))
            .map_err(|err| format!("student store start failed: {err}"))
    })?;
    f(&writer.handle())
}

fn to_student_item(student: &Student) -> StudentItem {
    StudentItem {
        id: student.id.clone(),
        name: student.name.clone(),
        student_class: student.class.clone(),
        major: student.major.clone(),
        initials: student.initials(),
    }
}
