use rollbook_store::{NewTeacher, TeacherStore, TeacherUpdate};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::modules::teachers::model::{CreateTeacherDto, Teacher, UpdateTeacherDto};
use crate::utils::errors::AppError;

const ENTITY: &str = "teacher";

/// Picks which unique field to report when a duplicate is found; an
/// identifier collision wins over an email collision.
fn conflict_field(existing: &Teacher, candidate_teacher_id: i64) -> &'static str {
    if existing.teacher_id == candidate_teacher_id {
        "teacher_id"
    } else {
        "email"
    }
}

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(store))]
    pub async fn get_teachers(store: &dyn TeacherStore) -> Result<Vec<Teacher>, AppError> {
        store
            .find_all()
            .await
            .map_err(|e| AppError::from_store(ENTITY, e))
    }

    #[instrument(skip(store))]
    pub async fn get_teacher(store: &dyn TeacherStore, id: Uuid) -> Result<Teacher, AppError> {
        store
            .find_by_id(id)
            .await
            .map_err(|e| AppError::from_store(ENTITY, e))?
            .ok_or_else(|| AppError::not_found("Teacher"))
    }

    #[instrument(skip(store, dto))]
    pub async fn create_teacher(
        store: &dyn TeacherStore,
        dto: CreateTeacherDto,
    ) -> Result<Teacher, AppError> {
        dto.validate().map_err(AppError::validation)?;

        let record = NewTeacher {
            teacher_id: dto.teacher_id,
            name: dto.name.trim().to_string(),
            email: dto.email.trim().to_lowercase(),
            phone: dto.phone.trim().to_string(),
            subject: dto.subject.trim().to_string(),
        };

        if let Some(existing) = store
            .find_duplicate(record.teacher_id, &record.email, None)
            .await
            .map_err(|e| AppError::from_store(ENTITY, e))?
        {
            return Err(AppError::conflict(
                ENTITY,
                conflict_field(&existing, record.teacher_id),
            ));
        }

        store
            .insert(record)
            .await
            .map_err(|e| AppError::from_store(ENTITY, e))
    }

    #[instrument(skip(store, dto))]
    pub async fn update_teacher(
        store: &dyn TeacherStore,
        id: Uuid,
        dto: UpdateTeacherDto,
    ) -> Result<Teacher, AppError> {
        let existing = Self::get_teacher(store, id).await?;

        dto.validate().map_err(AppError::validation)?;

        // teacher_id is write-once: the DTO cannot carry it, and the
        // candidate for the uniqueness check is always the stored value.
        let record = TeacherUpdate {
            name: dto
                .name
                .map(|name| name.trim().to_string())
                .unwrap_or(existing.name),
            email: dto
                .email
                .map(|email| email.trim().to_lowercase())
                .unwrap_or(existing.email),
            phone: dto
                .phone
                .map(|phone| phone.trim().to_string())
                .unwrap_or(existing.phone),
            subject: dto
                .subject
                .map(|subject| subject.trim().to_string())
                .unwrap_or(existing.subject),
        };

        if let Some(duplicate) = store
            .find_duplicate(existing.teacher_id, &record.email, Some(id))
            .await
            .map_err(|e| AppError::from_store(ENTITY, e))?
        {
            return Err(AppError::conflict(
                ENTITY,
                conflict_field(&duplicate, existing.teacher_id),
            ));
        }

        store
            .update_by_id(id, record)
            .await
            .map_err(|e| AppError::from_store(ENTITY, e))?
            .ok_or_else(|| AppError::not_found("Teacher"))
    }

    #[instrument(skip(store))]
    pub async fn delete_teacher(store: &dyn TeacherStore, id: Uuid) -> Result<(), AppError> {
        let found = store
            .delete_by_id(id)
            .await
            .map_err(|e| AppError::from_store(ENTITY, e))?;

        if !found {
            return Err(AppError::not_found("Teacher"));
        }

        Ok(())
    }
}
