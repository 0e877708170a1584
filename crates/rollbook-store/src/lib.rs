//! # Rollbook Store
//!
//! The storage collaborator for the Rollbook API.
//!
//! Record services talk to persistence exclusively through the
//! [`StudentStore`] and [`TeacherStore`] traits, so the backend is an
//! explicitly constructed handle injected at startup rather than a global
//! client. Two backends are provided:
//!
//! - [`postgres`]: the production backend. Its unique indexes are the final
//!   authority on uniqueness; a violated index surfaces as
//!   [`StoreError::Duplicate`] naming the colliding field, so callers never
//!   inspect engine-specific error codes.
//! - [`memory`]: an in-process backend with the same uniqueness semantics,
//!   used by the integration tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use rollbook_models::{Gender, Student, Teacher};
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use postgres::{PgStudentStore, PgTeacherStore};

/// Faults a storage backend can report.
///
/// `Duplicate` carries the name of the field whose unique constraint was
/// violated; everything else is an opaque backend fault that callers
/// surface without retrying.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate value for {0}")]
    Duplicate(&'static str),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Write-side field set for a student, used for both insert and update.
///
/// Storage identity and timestamps are system-managed and never supplied
/// by the caller.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub student_id: i64,
    pub name: String,
    pub address: String,
    pub email: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
}

/// Write-side field set for inserting a teacher.
#[derive(Debug, Clone)]
pub struct NewTeacher {
    pub teacher_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
}

/// Write-side field set for updating a teacher.
///
/// `teacher_id` is write-once, so it has no slot here and the backends
/// never touch that column on update.
#[derive(Debug, Clone)]
pub struct TeacherUpdate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
}

/// Persistence operations for student records.
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Student>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, StoreError>;

    /// Any student whose `student_id` or `email` matches the candidate,
    /// excluding the given storage identity. When both fields collide on
    /// different records, the `student_id` match is returned.
    async fn find_duplicate(
        &self,
        student_id: i64,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Student>, StoreError>;

    async fn insert(&self, new: NewStudent) -> Result<Student, StoreError>;

    /// Returns `None` when no record with that identity exists.
    async fn update_by_id(
        &self,
        id: Uuid,
        changes: NewStudent,
    ) -> Result<Option<Student>, StoreError>;

    /// Returns whether a record was actually deleted.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Persistence operations for teacher records.
#[async_trait]
pub trait TeacherStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Teacher>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Teacher>, StoreError>;

    /// Any teacher whose `teacher_id` or `email` matches the candidate,
    /// excluding the given storage identity. When both fields collide on
    /// different records, the `teacher_id` match is returned.
    async fn find_duplicate(
        &self,
        teacher_id: i64,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Teacher>, StoreError>;

    async fn insert(&self, new: NewTeacher) -> Result<Teacher, StoreError>;

    /// Returns `None` when no record with that identity exists.
    async fn update_by_id(
        &self,
        id: Uuid,
        changes: TeacherUpdate,
    ) -> Result<Option<Teacher>, StoreError>;

    /// Returns whether a record was actually deleted.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError>;
}
