use rollbook_store::{NewStudent, StudentStore};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::modules::students::model::{CreateStudentDto, Student, UpdateStudentDto};
use crate::utils::errors::AppError;

const ENTITY: &str = "student";

/// Picks which unique field to report when a duplicate is found; an
/// identifier collision wins over an email collision.
fn conflict_field(existing: &Student, candidate_student_id: i64) -> &'static str {
    if existing.student_id == candidate_student_id {
        "student_id"
    } else {
        "email"
    }
}

pub struct StudentService;

impl StudentService {
    #[instrument(skip(store))]
    pub async fn get_students(store: &dyn StudentStore) -> Result<Vec<Student>, AppError> {
        store
            .find_all()
            .await
            .map_err(|e| AppError::from_store(ENTITY, e))
    }

    #[instrument(skip(store))]
    pub async fn get_student(store: &dyn StudentStore, id: Uuid) -> Result<Student, AppError> {
        store
            .find_by_id(id)
            .await
            .map_err(|e| AppError::from_store(ENTITY, e))?
            .ok_or_else(|| AppError::not_found("Student"))
    }

    #[instrument(skip(store, dto))]
    pub async fn create_student(
        store: &dyn StudentStore,
        dto: CreateStudentDto,
    ) -> Result<Student, AppError> {
        dto.validate().map_err(AppError::validation)?;

        let record = NewStudent {
            student_id: dto.student_id,
            name: dto.name.trim().to_string(),
            address: dto.address.trim().to_string(),
            email: dto.email.trim().to_lowercase(),
            gender: dto.gender,
            date_of_birth: dto.date_of_birth,
        };

        if let Some(existing) = store
            .find_duplicate(record.student_id, &record.email, None)
            .await
            .map_err(|e| AppError::from_store(ENTITY, e))?
        {
            return Err(AppError::conflict(
                ENTITY,
                conflict_field(&existing, record.student_id),
            ));
        }

        store
            .insert(record)
            .await
            .map_err(|e| AppError::from_store(ENTITY, e))
    }

    #[instrument(skip(store, dto))]
    pub async fn update_student(
        store: &dyn StudentStore,
        id: Uuid,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let existing = Self::get_student(store, id).await?;

        dto.validate().map_err(AppError::validation)?;

        let record = NewStudent {
            student_id: dto.student_id.unwrap_or(existing.student_id),
            name: dto
                .name
                .map(|name| name.trim().to_string())
                .unwrap_or(existing.name),
            address: dto
                .address
                .map(|address| address.trim().to_string())
                .unwrap_or(existing.address),
            email: dto
                .email
                .map(|email| email.trim().to_lowercase())
                .unwrap_or(existing.email),
            gender: dto.gender.unwrap_or(existing.gender),
            date_of_birth: dto.date_of_birth.unwrap_or(existing.date_of_birth),
        };

        // The record's own identity is excluded, so saving a record back
        // unchanged never conflicts with itself.
        if let Some(duplicate) = store
            .find_duplicate(record.student_id, &record.email, Some(id))
            .await
            .map_err(|e| AppError::from_store(ENTITY, e))?
        {
            return Err(AppError::conflict(
                ENTITY,
                conflict_field(&duplicate, record.student_id),
            ));
        }

        store
            .update_by_id(id, record)
            .await
            .map_err(|e| AppError::from_store(ENTITY, e))?
            .ok_or_else(|| AppError::not_found("Student"))
    }

    #[instrument(skip(store))]
    pub async fn delete_student(store: &dyn StudentStore, id: Uuid) -> Result<(), AppError> {
        let found = store
            .delete_by_id(id)
            .await
            .map_err(|e| AppError::from_store(ENTITY, e))?;

        if !found {
            return Err(AppError::not_found("Student"));
        }

        Ok(())
    }
}
