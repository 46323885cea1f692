//! Student use-case service.
//!
//! # Responsibility
//! - Provide the CRUD entry points used by UI-facing callers.
//! - Apply the form rule (all fields non-blank, trimmed) before persistence.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::student::{Student, StudentDraft, StudentValidationError};
use crate::repo::student_repo::{RepoError, StudentRepository};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for student use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input rejected by the form rule; nothing was written.
    Validation(StudentValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<StudentValidationError> for ServiceError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case wrapper over a `StudentRepository`.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the wrapped repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Lists every student in insertion order.
    pub fn list_students(&self) -> ServiceResult<Vec<Student>> {
        Ok(self.repo.list_students()?)
    }

    /// Gets one student by id.
    pub fn get_student(&self, id: &str) -> ServiceResult<Option<Student>> {
        Ok(self.repo.get_student(id)?)
    }

    /// Creates a student from form input.
    ///
    /// # Contract
    /// - Fields are trimmed before storage.
    /// - Blank fields fail with `ServiceError::Validation`.
    pub fn create_student(&self, draft: &StudentDraft) -> ServiceResult<Student> {
        let draft = draft.trimmed();
        draft.validate()?;
        Ok(self.repo.create_student(draft)?)
    }

    /// Replaces the editable fields of an existing student.
    ///
    /// An id that is not in the collection is a silent no-op, matching the
    /// repository contract.
    pub fn update_student(&self, student: &Student) -> ServiceResult<()> {
        let draft = student.to_draft().trimmed();
        draft.validate()?;
        let mut record = student.clone();
        record.apply(draft);
        Ok(self.repo.update_student(&record)?)
    }

    /// Deletes a student by id; unknown ids are a no-op.
    pub fn delete_student(&self, id: &str) -> ServiceResult<()> {
        Ok(self.repo.delete_student(id)?)
    }

    /// Removes every student (the "reset roster" action).
    pub fn clear_students(&self) -> ServiceResult<()> {
        Ok(self.repo.clear_students()?)
    }
}
