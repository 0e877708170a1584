//! In-memory storage backend.
//!
//! Mirrors the Postgres backend's semantics, including the uniqueness
//! constraints and the id-before-email precedence in duplicate lookups,
//! so the integration tests can drive the full service pipeline without a
//! database.

use chrono::Utc;
use rollbook_models::{Student, Teacher};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{NewStudent, NewTeacher, StoreError, StudentStore, TeacherStore, TeacherUpdate};

#[derive(Default)]
pub struct MemoryStudentStore {
    records: RwLock<Vec<Student>>,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl StudentStore for MemoryStudentStore {
    async fn find_all(&self) -> Result<Vec<Student>, StoreError> {
        let records = self.records.read().await;
        let mut all = records.clone();
        all.sort_by_key(|s| s.student_id);
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|s| s.id == id).cloned())
    }

    async fn find_duplicate(
        &self,
        student_id: i64,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Student>, StoreError> {
        let records = self.records.read().await;
        let others = || {
            records
                .iter()
                .filter(|s| exclude.is_none_or(|excluded| s.id != excluded))
        };
        let by_id = others().find(|s| s.student_id == student_id);
        let by_email = others().find(|s| s.email == email);
        Ok(by_id.or(by_email).cloned())
    }

    async fn insert(&self, new: NewStudent) -> Result<Student, StoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|s| s.student_id == new.student_id) {
            return Err(StoreError::Duplicate("student_id"));
        }
        if records.iter().any(|s| s.email == new.email) {
            return Err(StoreError::Duplicate("email"));
        }

        let now = Utc::now();
        let student = Student {
            id: Uuid::new_v4(),
            student_id: new.student_id,
            name: new.name,
            address: new.address,
            email: new.email,
            gender: new.gender,
            date_of_birth: new.date_of_birth,
            created_at: now,
            updated_at: now,
        };
        records.push(student.clone());
        Ok(student)
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        changes: NewStudent,
    ) -> Result<Option<Student>, StoreError> {
        let mut records = self.records.write().await;
        if records
            .iter()
            .any(|s| s.id != id && s.student_id == changes.student_id)
        {
            return Err(StoreError::Duplicate("student_id"));
        }
        if records.iter().any(|s| s.id != id && s.email == changes.email) {
            return Err(StoreError::Duplicate("email"));
        }

        let Some(student) = records.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        student.student_id = changes.student_id;
        student.name = changes.name;
        student.address = changes.address;
        student.email = changes.email;
        student.gender = changes.gender;
        student.date_of_birth = changes.date_of_birth;
        student.updated_at = Utc::now();
        Ok(Some(student.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|s| s.id != id);
        Ok(records.len() < before)
    }
}

#[derive(Default)]
pub struct MemoryTeacherStore {
    records: RwLock<Vec<Teacher>>,
}

impl MemoryTeacherStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TeacherStore for MemoryTeacherStore {
    async fn find_all(&self) -> Result<Vec<Teacher>, StoreError> {
        let records = self.records.read().await;
        let mut all = records.clone();
        all.sort_by_key(|t| t.teacher_id);
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Teacher>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|t| t.id == id).cloned())
    }

    async fn find_duplicate(
        &self,
        teacher_id: i64,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Teacher>, StoreError> {
        let records = self.records.read().await;
        let others = || {
            records
                .iter()
                .filter(|t| exclude.is_none_or(|excluded| t.id != excluded))
        };
        let by_id = others().find(|t| t.teacher_id == teacher_id);
        let by_email = others().find(|t| t.email == email);
        Ok(by_id.or(by_email).cloned())
    }

    async fn insert(&self, new: NewTeacher) -> Result<Teacher, StoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|t| t.teacher_id == new.teacher_id) {
            return Err(StoreError::Duplicate("teacher_id"));
        }
        if records.iter().any(|t| t.email == new.email) {
            return Err(StoreError::Duplicate("email"));
        }

        let now = Utc::now();
        let teacher = Teacher {
            id: Uuid::new_v4(),
            teacher_id: new.teacher_id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            subject: new.subject,
            created_at: now,
            updated_at: now,
        };
        records.push(teacher.clone());
        Ok(teacher)
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        changes: TeacherUpdate,
    ) -> Result<Option<Teacher>, StoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|t| t.id != id && t.email == changes.email) {
            return Err(StoreError::Duplicate("email"));
        }

        let Some(teacher) = records.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        teacher.name = changes.name;
        teacher.email = changes.email;
        teacher.phone = changes.phone;
        teacher.subject = changes.subject;
        teacher.updated_at = Utc::now();
        Ok(Some(teacher.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|t| t.id != id);
        Ok(records.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rollbook_models::Gender;

    fn new_student(student_id: i64, email: &str) -> NewStudent {
        NewStudent {
            student_id,
            name: "Test Student".to_string(),
            address: "12 High Street".to_string(),
            email: email.to_string(),
            gender: Gender::Female,
            date_of_birth: NaiveDate::from_ymd_opt(2010, 1, 15).unwrap(),
        }
    }

    fn new_teacher(teacher_id: i64, email: &str) -> NewTeacher {
        NewTeacher {
            teacher_id,
            name: "Test Teacher".to_string(),
            email: email.to_string(),
            phone: "0123456789".to_string(),
            subject: "History".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_identity_and_timestamps() {
        let store = MemoryStudentStore::new();
        let student = store.insert(new_student(1001, "a@x.com")).await.unwrap();
        assert_eq!(student.student_id, 1001);
        assert_eq!(student.created_at, student.updated_at);
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_rejected() {
        let store = MemoryStudentStore::new();
        store.insert(new_student(1001, "a@x.com")).await.unwrap();
        let err = store.insert(new_student(1001, "b@y.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("student_id")));
    }

    #[tokio::test]
    async fn test_insert_duplicate_email_rejected() {
        let store = MemoryStudentStore::new();
        store.insert(new_student(1001, "a@x.com")).await.unwrap();
        let err = store.insert(new_student(2002, "a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("email")));
    }

    #[tokio::test]
    async fn test_find_duplicate_prefers_id_match() {
        let store = MemoryStudentStore::new();
        store.insert(new_student(1001, "a@x.com")).await.unwrap();
        store.insert(new_student(2002, "b@y.com")).await.unwrap();

        // Candidate collides with record one by id and record two by email.
        let hit = store
            .find_duplicate(1001, "b@y.com", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.student_id, 1001);
    }

    #[tokio::test]
    async fn test_find_duplicate_excludes_self() {
        let store = MemoryStudentStore::new();
        let student = store.insert(new_student(1001, "a@x.com")).await.unwrap();
        let hit = store
            .find_duplicate(1001, "a@x.com", Some(student.id))
            .await
            .unwrap();
        assert!(hit.is_none());
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let store = MemoryStudentStore::new();
        let updated = store
            .update_by_id(Uuid::new_v4(), new_student(1001, "a@x.com"))
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_update_bumps_updated_at() {
        let store = MemoryStudentStore::new();
        let student = store.insert(new_student(1001, "a@x.com")).await.unwrap();
        let updated = store
            .update_by_id(student.id, new_student(1001, "new@x.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.email, "new@x.com");
        assert_eq!(updated.created_at, student.created_at);
        assert!(updated.updated_at >= student.updated_at);
    }

    #[tokio::test]
    async fn test_delete_reports_found() {
        let store = MemoryStudentStore::new();
        let student = store.insert(new_student(1001, "a@x.com")).await.unwrap();
        assert!(store.delete_by_id(student.id).await.unwrap());
        assert!(!store.delete_by_id(student.id).await.unwrap());
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_teacher_update_keeps_teacher_id() {
        let store = MemoryTeacherStore::new();
        let teacher = store.insert(new_teacher(42, "t@x.com")).await.unwrap();
        let updated = store
            .update_by_id(
                teacher.id,
                TeacherUpdate {
                    name: "Renamed".to_string(),
                    email: "t@x.com".to_string(),
                    phone: "0123456789".to_string(),
                    subject: "Physics".to_string(),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.teacher_id, 42);
        assert_eq!(updated.subject, "Physics");
    }

    #[tokio::test]
    async fn test_teacher_update_duplicate_email_rejected() {
        let store = MemoryTeacherStore::new();
        store.insert(new_teacher(1, "a@x.com")).await.unwrap();
        let second = store.insert(new_teacher(2, "b@y.com")).await.unwrap();
        let err = store
            .update_by_id(
                second.id,
                TeacherUpdate {
                    name: "Test Teacher".to_string(),
                    email: "a@x.com".to_string(),
                    phone: "0123456789".to_string(),
                    subject: "History".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("email")));
    }
}
