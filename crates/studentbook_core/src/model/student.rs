//! Student domain model.
//!
//! # Responsibility
//! - Define the student record and its JSON wire shape.
//! - Provide the form validation rule shared by service and FFI callers.
//!
//! # Invariants
//! - `id` is assigned once by the store and never rewritten.
//! - Wire fields are exactly `id`, `name`, `class`, `major` (all strings).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a student within the collection.
///
/// Kept as an opaque string: blobs written by earlier clients carry
/// millisecond-timestamp ids, new records carry UUID v4 text.
pub type StudentId = String;

const MAX_INITIALS: usize = 2;

/// Form-level validation errors for student input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentValidationError {
    EmptyName,
    EmptyClass,
    EmptyMajor,
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "student name must not be empty"),
            Self::EmptyClass => write!(f, "student class must not be empty"),
            Self::EmptyMajor => write!(f, "student major must not be empty"),
        }
    }
}

impl Error for StudentValidationError {}

/// Persisted student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Assigned by the store on insert.
    pub id: StudentId,
    /// Display name.
    pub name: String,
    /// Grade/section label, e.g. `XI`.
    pub class: String,
    /// Specialization label, e.g. `PPLG`.
    pub major: String,
}

impl Student {
    /// Builds a record from a draft and an already-chosen id.
    pub fn from_draft(id: impl Into<StudentId>, draft: StudentDraft) -> Self {
        Self {
            id: id.into(),
            name: draft.name,
            class: draft.class,
            major: draft.major,
        }
    }

    /// Returns the editable fields of this record.
    pub fn to_draft(&self) -> StudentDraft {
        StudentDraft {
            name: self.name.clone(),
            class: self.class.clone(),
            major: self.major.clone(),
        }
    }

    /// Avatar label: first letter of each word, uppercased, at most two chars.
    ///
    /// `"budi santoso"` -> `"BS"`, `"ada"` -> `"A"`, `""` -> `""`.
    pub fn initials(&self) -> String {
        self.name
            .split(' ')
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(MAX_INITIALS)
            .collect()
    }

    /// Applies the editable fields of `draft`, keeping `id`.
    pub fn apply(&mut self, draft: StudentDraft) {
        self.name = draft.name;
        self.class = draft.class;
        self.major = draft.major;
    }
}

/// Insert payload: every student field except `id`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StudentDraft {
    pub name: String,
    pub class: String,
    pub major: String,
}

impl StudentDraft {
    pub fn new(
        name: impl Into<String>,
        class: impl Into<String>,
        major: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            major: major.into(),
        }
    }

    /// Returns a copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            class: self.class.trim().to_string(),
            major: self.major.trim().to_string(),
        }
    }

    /// Checks the form rule: all three fields are non-blank.
    ///
    /// The record store never calls this; it is enforced by the service layer.
    pub fn validate(&self) -> Result<(), StudentValidationError> {
        if self.name.trim().is_empty() {
            return Err(StudentValidationError::EmptyName);
        }
        if self.class.trim().is_empty() {
            return Err(StudentValidationError::EmptyClass);
        }
        if self.major.trim().is_empty() {
            return Err(StudentValidationError::EmptyMajor);
        }
        Ok(())
    }
}

/// Generates a fresh identifier for a new record.
pub fn new_student_id() -> StudentId {
    Uuid::new_v4().to_string()
}
