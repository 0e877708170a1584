//! # Rollbook Models
//!
//! Domain models and DTOs for the Rollbook API.
//!
//! This crate provides the data structures for the two record kinds the
//! system manages — students and teachers — together with the canonical
//! validation rules for every field. The rule set lives in exactly one
//! place ([`fields`]) and is composed into whole-record validation by the
//! `Validate` derives on the create/update DTOs, so the service boundary
//! and any presentation layer share the same rules.
//!
//! # Modules
//!
//! - [`fields`]: per-field validator functions with stable error codes
//! - [`students`]: student entity and DTOs
//! - [`teachers`]: teacher entity and DTOs

pub mod fields;
pub mod students;
pub mod teachers;

// Re-export commonly used types at crate root for convenience
pub use students::{CreateStudentDto, Gender, Student, UpdateStudentDto};
pub use teachers::{CreateTeacherDto, Teacher, UpdateTeacherDto};
