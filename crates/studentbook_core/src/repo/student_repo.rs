//! Student repository contract and key-value implementation.
//!
//! # Responsibility
//! - Provide list/create/update/delete over a single JSON blob.
//! - Assign collision-free ids on create.
//! - Decide how unreadable blobs are reported (`ReadPolicy`).
//!
//! # Invariants
//! - Insert appends, update replaces in place, delete removes in place.
//! - A failed write leaves the persisted collection untouched.
//! - Update and delete of an unknown id rewrite the collection unchanged.
//! - A substrate read failure never turns into a write of an empty list.
//!
//! # Concurrency
//! Read-modify-write is not atomic across callers: two interleaved
//! mutations on the same repository can lose one update. Callers that may
//! overlap must go through `service::writer::StoreWriter`.

use crate::kv::{KvError, KvStore};
use crate::model::student::{new_student_id, Student, StudentDraft};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

/// Storage key used by every released client.
pub const DEFAULT_STORAGE_KEY: &str = "@students_data";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for student persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Substrate read or write failed.
    Storage(KvError),
    /// Persisted blob is not a JSON array of students (strict reads only).
    CorruptData(String),
    /// Collection could not be encoded.
    Encode(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::CorruptData(message) => write!(f, "invalid persisted student data: {message}"),
            Self::Encode(message) => write!(f, "failed to encode student data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::CorruptData(_) | Self::Encode(_) => None,
        }
    }
}

impl From<KvError> for RepoError {
    fn from(value: KvError) -> Self {
        Self::Storage(value)
    }
}

/// How an unreadable or undecodable blob is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadPolicy {
    /// Log, count, and report an empty collection.
    #[default]
    Lenient,
    /// Surface `RepoError::Storage` / `RepoError::CorruptData`.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadMode {
    Listing,
    /// Read ahead of a write: a substrate read failure always fails the
    /// mutation, otherwise the write would persist an empty collection.
    Mutation,
}

/// Construction options for `KvStudentRepository`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub storage_key: String,
    pub read_policy: ReadPolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            read_policy: ReadPolicy::default(),
        }
    }
}

/// Repository interface for the student collection.
pub trait StudentRepository {
    /// Returns the persisted collection in insertion order.
    fn list_students(&self) -> RepoResult<Vec<Student>>;
    /// Appends a new record with a freshly assigned id.
    fn create_student(&self, draft: StudentDraft) -> RepoResult<Student>;
    /// Replaces the record with the same id; unknown ids are a no-op.
    fn update_student(&self, student: &Student) -> RepoResult<()>;
    /// Removes the record with `id`; unknown ids are a no-op.
    fn delete_student(&self, id: &str) -> RepoResult<()>;
    /// Drops the whole collection.
    fn clear_students(&self) -> RepoResult<()>;

    /// Full-scan lookup by id.
    fn get_student(&self, id: &str) -> RepoResult<Option<Student>> {
        Ok(self
            .list_students()?
            .into_iter()
            .find(|student| student.id == id))
    }
}

/// `StudentRepository` storing the collection as one JSON blob in a `KvStore`.
pub struct KvStudentRepository<S: KvStore> {
    store: S,
    options: StoreOptions,
    degraded_reads: AtomicU64,
}

impl<S: KvStore> KvStudentRepository<S> {
    /// Creates a repository with default key and lenient reads.
    pub fn new(store: S) -> Self {
        Self::with_options(store, StoreOptions::default())
    }

    pub fn with_options(store: S, options: StoreOptions) -> Self {
        Self {
            store,
            options,
            degraded_reads: AtomicU64::new(0),
        }
    }

    /// Borrows the owned substrate.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of lenient reads that masked a failure as an empty collection.
    pub fn degraded_reads(&self) -> u64 {
        self.degraded_reads.load(Ordering::Relaxed)
    }

    fn load(&self, mode: ReadMode) -> RepoResult<Vec<Student>> {
        let blob = match self.store.get(&self.options.storage_key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Ok(Vec::new()),
            Err(err) if mode == ReadMode::Mutation => {
                error!(
                    "event=student_load module=repo status=error error_code=storage_read_failed error={err}"
                );
                return Err(err.into());
            }
            Err(err) => return self.degrade("storage_read_failed", err.into()),
        };

        match decode_students(&blob) {
            Ok(students) => {
                debug!(
                    "event=student_load module=repo status=ok count={}",
                    students.len()
                );
                Ok(students)
            }
            Err(err) => self.degrade("deserialization_failed", err),
        }
    }

    fn degrade(&self, error_code: &str, err: RepoError) -> RepoResult<Vec<Student>> {
        match self.options.read_policy {
            ReadPolicy::Strict => {
                error!(
                    "event=student_load module=repo status=error policy=strict error_code={error_code} error={err}"
                );
                Err(err)
            }
            ReadPolicy::Lenient => {
                let total = self.degraded_reads.fetch_add(1, Ordering::Relaxed) + 1;
                error!(
                    "event=student_load module=repo status=degraded policy=lenient error_code={error_code} degraded_total={total} error={err}"
                );
                Ok(Vec::new())
            }
        }
    }

    fn write_all(&self, event: &str, students: &[Student]) -> RepoResult<()> {
        let blob = encode_students(students)?;
        if let Err(err) = self.store.set(&self.options.storage_key, &blob) {
            error!(
                "event={event} module=repo status=error error_code=storage_write_failed error={err}"
            );
            return Err(err.into());
        }
        Ok(())
    }
}

impl<S: KvStore> StudentRepository for KvStudentRepository<S> {
    fn list_students(&self) -> RepoResult<Vec<Student>> {
        self.load(ReadMode::Listing)
    }

    fn create_student(&self, draft: StudentDraft) -> RepoResult<Student> {
        let mut students = self.load(ReadMode::Mutation)?;
        let student = Student::from_draft(unique_id(&students), draft);
        students.push(student.clone());

        self.write_all("student_create", &students)?;
        info!(
            "event=student_create module=repo status=ok count={}",
            students.len()
        );
        Ok(student)
    }

    fn update_student(&self, student: &Student) -> RepoResult<()> {
        let mut students = self.load(ReadMode::Mutation)?;
        let mut matched = false;
        for existing in students.iter_mut().filter(|s| s.id == student.id) {
            *existing = student.clone();
            matched = true;
        }
        if !matched {
            warn!("event=student_update module=repo status=noop reason=id_not_found");
        }

        self.write_all("student_update", &students)?;
        info!("event=student_update module=repo status=ok matched={matched}");
        Ok(())
    }

    fn delete_student(&self, id: &str) -> RepoResult<()> {
        let mut students = self.load(ReadMode::Mutation)?;
        let before = students.len();
        students.retain(|student| student.id != id);
        let removed = before - students.len();

        self.write_all("student_delete", &students)?;
        info!(
            "event=student_delete module=repo status=ok removed={removed} count={}",
            students.len()
        );
        Ok(())
    }

    fn clear_students(&self) -> RepoResult<()> {
        if let Err(err) = self.store.remove(&self.options.storage_key) {
            error!(
                "event=student_clear module=repo status=error error_code=storage_write_failed error={err}"
            );
            return Err(err.into());
        }
        info!("event=student_clear module=repo status=ok");
        Ok(())
    }
}

/// Decodes a persisted blob into the student sequence.
pub fn decode_students(blob: &str) -> RepoResult<Vec<Student>> {
    serde_json::from_str(blob).map_err(|err| RepoError::CorruptData(err.to_string()))
}

/// Encodes the student sequence as the persisted JSON array.
pub fn encode_students(students: &[Student]) -> RepoResult<String> {
    serde_json::to_string(students).map_err(|err| RepoError::Encode(err.to_string()))
}

fn unique_id(students: &[Student]) -> String {
    loop {
        let candidate = new_student_id();
        if students.iter().all(|student| student.id != candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_students, encode_students, RepoError};
    use crate::model::student::{Student, StudentDraft};

    #[test]
    fn decode_accepts_legacy_timestamp_ids() {
        let blob = r#"[{"id":"1712345678901","name":"Budi","class":"X","major":"TKJ"}]"#;
        let students = decode_students(blob).unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, "1712345678901");
        assert_eq!(students[0].class, "X");
    }

    #[test]
    fn decode_rejects_non_array_and_missing_fields() {
        assert!(matches!(
            decode_students(r#"{"id":"1"}"#),
            Err(RepoError::CorruptData(_))
        ));
        assert!(matches!(
            decode_students(r#"[{"id":"1","name":"Ada"}]"#),
            Err(RepoError::CorruptData(_))
        ));
        assert!(matches!(
            decode_students("not json"),
            Err(RepoError::CorruptData(_))
        ));
    }

    #[test]
    fn encode_writes_array_of_flat_objects() {
        let students = vec![Student::from_draft(
            "a1",
            StudentDraft::new("Ada", "XI", "PPLG"),
        )];
        let blob = encode_students(&students).unwrap();
        assert_eq!(
            blob,
            r#"[{"id":"a1","name":"Ada","class":"XI","major":"PPLG"}]"#
        );
    }
}
