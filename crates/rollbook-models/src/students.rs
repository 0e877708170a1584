//! Student domain models and DTOs.
//!
//! A student record carries a user-facing numeric identifier (`student_id`)
//! that is distinct from the system-assigned storage identity (`id`). Both
//! `student_id` and `email` are unique across students; the storage layer's
//! unique indexes are the final authority on that.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, FromRow, Type,
    postgres::PgTypeInfo,
};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::fields;

/// Student gender, restricted to the two values the enrolment forms accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// The lowercase wire/storage form of the value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(format!("'{}' is not a valid gender", other)),
        }
    }
}

// Stored as TEXT in Postgres; encode/decode through the string form.
impl Type<sqlx::Postgres> for Gender {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for Gender {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for Gender {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as Decode<'r, sqlx::Postgres>>::decode(value)?;
        s.parse().map_err(Into::into)
    }
}

/// A student record as persisted.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Student {
    /// System-assigned storage identity.
    pub id: Uuid,
    /// User-facing student number, unique across students.
    pub student_id: i64,
    pub name: String,
    pub address: String,
    pub email: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new student.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateStudentDto {
    #[validate(range(min = 0, message = "Must be a non-negative number"))]
    pub student_id: i64,
    #[validate(custom(function = fields::person_name))]
    pub name: String,
    #[validate(custom(function = fields::address))]
    pub address: String,
    #[validate(custom(function = fields::email))]
    pub email: String,
    pub gender: Gender,
    #[validate(custom(function = fields::date_of_birth))]
    pub date_of_birth: NaiveDate,
}

/// DTO for updating an existing student.
///
/// All fields are optional; only provided fields are re-validated and
/// merged over the stored record.
#[derive(Deserialize, Debug, Default, ToSchema, Validate)]
pub struct UpdateStudentDto {
    #[validate(range(min = 0, message = "Must be a non-negative number"))]
    pub student_id: Option<i64>,
    #[validate(custom(function = fields::person_name))]
    pub name: Option<String>,
    #[validate(custom(function = fields::address))]
    pub address: Option<String>,
    #[validate(custom(function = fields::email))]
    pub email: Option<String>,
    pub gender: Option<Gender>,
    #[validate(custom(function = fields::date_of_birth))]
    pub date_of_birth: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Months;

    fn valid_dto() -> CreateStudentDto {
        CreateStudentDto {
            student_id: 1001,
            name: "John Doe".to_string(),
            address: "12 High Street".to_string(),
            email: "john.doe@example.com".to_string(),
            gender: Gender::Male,
            date_of_birth: Utc::now().date_naive() - Months::new(12 * 12),
        }
    }

    #[test]
    fn test_create_student_dto_valid() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn test_negative_student_id() {
        let dto = CreateStudentDto {
            student_id: -1,
            ..valid_dto()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("student_id"));
    }

    #[test]
    fn test_invalid_name_characters() {
        let dto = CreateStudentDto {
            name: "John3".to_string(),
            ..valid_dto()
        };
        let errors = dto.validate().unwrap_err();
        let name_errors = &errors.field_errors()["name"];
        assert_eq!(name_errors[0].code, "invalid_characters");
    }

    #[test]
    fn test_short_address() {
        let dto = CreateStudentDto {
            address: "1 St".to_string(),
            ..valid_dto()
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(errors.field_errors()["address"][0].code, "too_short");
    }

    #[test]
    fn test_invalid_email() {
        let dto = CreateStudentDto {
            email: "not-an-email".to_string(),
            ..valid_dto()
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(errors.field_errors()["email"][0].code, "invalid_format");
    }

    #[test]
    fn test_all_failures_reported_together() {
        let dto = CreateStudentDto {
            name: "J".to_string(),
            address: "x".to_string(),
            email: "nope".to_string(),
            ..valid_dto()
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("address"));
        assert!(fields.contains_key("email"));
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let dto = CreateStudentDto {
            name: "J".to_string(),
            email: "nope".to_string(),
            ..valid_dto()
        };
        let first = dto.validate().unwrap_err();
        let second = dto.validate().unwrap_err();
        let keys = |e: &validator::ValidationErrors| {
            let mut k: Vec<String> =
                e.field_errors().keys().map(|k| k.to_string()).collect();
            k.sort();
            k
        };
        assert_eq!(keys(&first), keys(&second));
    }

    #[test]
    fn test_update_dto_empty_is_valid() {
        assert!(UpdateStudentDto::default().validate().is_ok());
    }

    #[test]
    fn test_update_dto_validates_present_fields() {
        let dto = UpdateStudentDto {
            name: Some("J".to_string()),
            ..Default::default()
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(errors.field_errors()["name"][0].code, "too_short");
    }

    #[test]
    fn test_gender_wire_format() {
        assert_eq!(serde_json::to_string(&Gender::Male).unwrap(), r#""male""#);
        let parsed: Gender = serde_json::from_str(r#""female""#).unwrap();
        assert_eq!(parsed, Gender::Female);
        assert!(serde_json::from_str::<Gender>(r#""other""#).is_err());
    }

    #[test]
    fn test_date_of_birth_wire_format() {
        let dto: CreateStudentDto = serde_json::from_value(serde_json::json!({
            "student_id": 1001,
            "name": "John Doe",
            "address": "12 High Street",
            "email": "john.doe@example.com",
            "gender": "male",
            "date_of_birth": "2010-01-15"
        }))
        .unwrap();
        assert_eq!(
            dto.date_of_birth,
            NaiveDate::from_ymd_opt(2010, 1, 15).unwrap()
        );
    }
}
