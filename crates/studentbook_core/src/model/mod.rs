//! Domain model for the student roster.
//!
//! # Responsibility
//! - Define the canonical student record persisted by core.
//! - Define the insert payload (`StudentDraft`) and its form rules.
//!
//! # Invariants
//! - Every persisted student is identified by a `StudentId` that is unique
//!   within the collection and never changes after creation.
//! - Deletion is a hard delete; there are no tombstones.

pub mod student;
