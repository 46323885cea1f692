//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Serialize concurrent callers through a single writer thread.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod student_service;
pub mod writer;
