//! Repository layer over the key-value substrate.
//!
//! # Responsibility
//! - Define the CRUD contract for the student collection.
//! - Keep blob encoding and substrate details out of service/FFI callers.
//!
//! # Invariants
//! - The whole collection lives in one JSON blob under one storage key.
//! - Every mutation is one read followed by at most one whole-blob write.

pub mod student_repo;
