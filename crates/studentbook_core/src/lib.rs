//! Core persistence for StudentBook.
//! This crate is the single source of truth for the student roster invariants.

pub mod kv;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use kv::{KvError, KvResult, KvStore, MemoryKvStore, SqliteKvStore, KV_SCHEMA_VERSION};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::student::{Student, StudentDraft, StudentId, StudentValidationError};
pub use repo::student_repo::{
    KvStudentRepository, ReadPolicy, RepoError, RepoResult, StoreOptions, StudentRepository,
    DEFAULT_STORAGE_KEY,
};
pub use service::student_service::{ServiceError, ServiceResult, StudentService};
pub use service::writer::{StoreHandle, StoreWriter, WriterError, WriterResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
