//! Flutter bridge for StudentBook core.
//! All exported functions live in `api`; FRB codegen consumes that module.

pub mod api;
