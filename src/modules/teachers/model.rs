//! Teacher data models and DTOs.
//!
//! Re-exported from the `rollbook-models` crate, which holds the canonical
//! validation rules shared by every layer.

pub use rollbook_models::teachers::*;
