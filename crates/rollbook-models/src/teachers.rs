//! Teacher domain models and DTOs.
//!
//! `teacher_id` is write-once: the update DTO deliberately has no
//! `teacher_id` field, so a client-supplied value is dropped during
//! deserialization and the stored identifier can never change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::fields;

/// A teacher record as persisted.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Teacher {
    /// System-assigned storage identity.
    pub id: Uuid,
    /// User-facing teacher number, unique across teachers and immutable.
    pub teacher_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new teacher.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateTeacherDto {
    #[validate(range(min = 0, message = "Must be a non-negative number"))]
    pub teacher_id: i64,
    #[validate(custom(function = fields::person_name))]
    pub name: String,
    #[validate(custom(function = fields::email))]
    pub email: String,
    #[validate(custom(function = fields::phone))]
    pub phone: String,
    #[validate(custom(function = fields::person_name))]
    pub subject: String,
}

/// DTO for updating an existing teacher.
///
/// `teacher_id` is intentionally absent: it cannot be changed after
/// creation, so any value a client sends is ignored.
#[derive(Deserialize, Debug, Default, ToSchema, Validate)]
pub struct UpdateTeacherDto {
    #[validate(custom(function = fields::person_name))]
    pub name: Option<String>,
    #[validate(custom(function = fields::email))]
    pub email: Option<String>,
    #[validate(custom(function = fields::phone))]
    pub phone: Option<String>,
    #[validate(custom(function = fields::person_name))]
    pub subject: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> CreateTeacherDto {
        CreateTeacherDto {
            teacher_id: 42,
            name: "Jane Smith".to_string(),
            email: "jane.smith@example.com".to_string(),
            phone: "0123456789".to_string(),
            subject: "Mathematics".to_string(),
        }
    }

    #[test]
    fn test_create_teacher_dto_valid() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn test_short_phone() {
        let dto = CreateTeacherDto {
            phone: "12345".to_string(),
            ..valid_dto()
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(errors.field_errors()["phone"][0].code, "too_short");
    }

    #[test]
    fn test_subject_uses_letters_only_rule() {
        let dto = CreateTeacherDto {
            subject: "Math 101".to_string(),
            ..valid_dto()
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(
            errors.field_errors()["subject"][0].code,
            "invalid_characters"
        );
    }

    #[test]
    fn test_all_failures_reported_together() {
        let dto = CreateTeacherDto {
            name: "".to_string(),
            email: "broken".to_string(),
            phone: "123".to_string(),
            ..valid_dto()
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["name"][0].code, "required");
        assert_eq!(fields["email"][0].code, "invalid_format");
        assert_eq!(fields["phone"][0].code, "too_short");
    }

    #[test]
    fn test_update_dto_ignores_teacher_id() {
        // Unknown fields, including teacher_id, are dropped by serde.
        let dto: UpdateTeacherDto = serde_json::from_value(serde_json::json!({
            "teacher_id": 999,
            "name": "New Name"
        }))
        .unwrap();
        assert_eq!(dto.name.as_deref(), Some("New Name"));
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_update_dto_empty_is_valid() {
        assert!(UpdateTeacherDto::default().validate().is_ok());
    }
}
