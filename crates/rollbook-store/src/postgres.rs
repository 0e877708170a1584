//! PostgreSQL storage backend.
//!
//! Uniqueness is enforced by the unique constraints declared in
//! `migrations/`; a violated constraint is classified into
//! [`StoreError::Duplicate`] by constraint name, so the pre-write
//! duplicate check in the services and a write-time race both surface as
//! the same fault.

use anyhow::Context;
use rollbook_models::{Student, Teacher};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{NewStudent, NewTeacher, StoreError, StudentStore, TeacherStore, TeacherUpdate};

fn write_error(e: sqlx::Error, id_field: &'static str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        let field = match db_err.constraint() {
            Some(constraint) if constraint.contains("email") => "email",
            _ => id_field,
        };
        return StoreError::Duplicate(field);
    }
    StoreError::Backend(anyhow::Error::new(e))
}

pub struct PgStudentStore {
    pool: PgPool,
}

impl PgStudentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl StudentStore for PgStudentStore {
    async fn find_all(&self) -> Result<Vec<Student>, StoreError> {
        sqlx::query_as::<_, Student>(
            r#"
            SELECT id, student_id, name, address, email, gender, date_of_birth,
                   created_at, updated_at
            FROM students
            ORDER BY student_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch students")
        .map_err(StoreError::Backend)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, StoreError> {
        sqlx::query_as::<_, Student>(
            r#"
            SELECT id, student_id, name, address, email, gender, date_of_birth,
                   created_at, updated_at
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch student by ID")
        .map_err(StoreError::Backend)
    }

    async fn find_duplicate(
        &self,
        student_id: i64,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Student>, StoreError> {
        // The ORDER BY makes a student_id match win when both unique
        // fields collide on different records.
        sqlx::query_as::<_, Student>(
            r#"
            SELECT id, student_id, name, address, email, gender, date_of_birth,
                   created_at, updated_at
            FROM students
            WHERE (student_id = $1 OR email = $2)
              AND ($3::uuid IS NULL OR id <> $3)
            ORDER BY (student_id = $1) DESC
            LIMIT 1
            "#,
        )
        .bind(student_id)
        .bind(email)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to check students for duplicates")
        .map_err(StoreError::Backend)
    }

    async fn insert(&self, new: NewStudent) -> Result<Student, StoreError> {
        sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (student_id, name, address, email, gender, date_of_birth)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, student_id, name, address, email, gender, date_of_birth,
                      created_at, updated_at
            "#,
        )
        .bind(new.student_id)
        .bind(&new.name)
        .bind(&new.address)
        .bind(&new.email)
        .bind(new.gender)
        .bind(new.date_of_birth)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "student_id"))
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        changes: NewStudent,
    ) -> Result<Option<Student>, StoreError> {
        sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET student_id = $1, name = $2, address = $3, email = $4,
                gender = $5, date_of_birth = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING id, student_id, name, address, email, gender, date_of_birth,
                      created_at, updated_at
            "#,
        )
        .bind(changes.student_id)
        .bind(&changes.name)
        .bind(&changes.address)
        .bind(&changes.email)
        .bind(changes.gender)
        .bind(changes.date_of_birth)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "student_id"))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete student")
            .map_err(StoreError::Backend)?;

        Ok(result.rows_affected() > 0)
    }
}

pub struct PgTeacherStore {
    pool: PgPool,
}

impl PgTeacherStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TeacherStore for PgTeacherStore {
    async fn find_all(&self) -> Result<Vec<Teacher>, StoreError> {
        sqlx::query_as::<_, Teacher>(
            r#"
            SELECT id, teacher_id, name, email, phone, subject, created_at, updated_at
            FROM teachers
            ORDER BY teacher_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch teachers")
        .map_err(StoreError::Backend)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Teacher>, StoreError> {
        sqlx::query_as::<_, Teacher>(
            r#"
            SELECT id, teacher_id, name, email, phone, subject, created_at, updated_at
            FROM teachers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch teacher by ID")
        .map_err(StoreError::Backend)
    }

    async fn find_duplicate(
        &self,
        teacher_id: i64,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Teacher>, StoreError> {
        sqlx::query_as::<_, Teacher>(
            r#"
            SELECT id, teacher_id, name, email, phone, subject, created_at, updated_at
            FROM teachers
            WHERE (teacher_id = $1 OR email = $2)
              AND ($3::uuid IS NULL OR id <> $3)
            ORDER BY (teacher_id = $1) DESC
            LIMIT 1
            "#,
        )
        .bind(teacher_id)
        .bind(email)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to check teachers for duplicates")
        .map_err(StoreError::Backend)
    }

    async fn insert(&self, new: NewTeacher) -> Result<Teacher, StoreError> {
        sqlx::query_as::<_, Teacher>(
            r#"
            INSERT INTO teachers (teacher_id, name, email, phone, subject)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, teacher_id, name, email, phone, subject, created_at, updated_at
            "#,
        )
        .bind(new.teacher_id)
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.subject)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "teacher_id"))
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        changes: TeacherUpdate,
    ) -> Result<Option<Teacher>, StoreError> {
        // teacher_id is never part of the SET list.
        sqlx::query_as::<_, Teacher>(
            r#"
            UPDATE teachers
            SET name = $1, email = $2, phone = $3, subject = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, teacher_id, name, email, phone, subject, created_at, updated_at
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.phone)
        .bind(&changes.subject)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "teacher_id"))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete teacher")
            .map_err(StoreError::Backend)?;

        Ok(result.rows_affected() > 0)
    }
}
