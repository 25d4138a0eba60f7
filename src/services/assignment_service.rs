use crate::error::{Error, Result};
use crate::models::student::Student;
use crate::models::user::{ParentAssignment, User};
use crate::workflow::Role;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct AssignmentService {
    pool: PgPool,
}

impl AssignmentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, parent_id: Uuid, student_id: Uuid) -> Result<ParentAssignment> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role, assigned_classes, is_active, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Parent user not found".to_string()))?;
        if user.role.parse::<Role>().ok() != Some(Role::Parent) {
            return Err(Error::BadRequest(format!(
                "User has role '{}', expected a parent",
                user.role
            )));
        }

        let student_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM students WHERE id = $1)")
                .bind(student_id)
                .fetch_one(&self.pool)
                .await?;
        if !student_exists {
            return Err(Error::NotFound("Student not found".to_string()));
        }

        let existing = sqlx::query_as::<_, ParentAssignment>(
            r#"
            SELECT id, parent_id, student_id, created_at
            FROM parent_assignments
            WHERE parent_id = $1 AND student_id = $2
            "#,
        )
        .bind(parent_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;
        if let Some(assignment) = existing {
            return Ok(assignment);
        }

        let assignment = sqlx::query_as::<_, ParentAssignment>(
            r#"
            INSERT INTO parent_assignments (parent_id, student_id)
            VALUES ($1, $2)
            RETURNING id, parent_id, student_id, created_at
            "#,
        )
        .bind(parent_id)
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(assignment)
    }

    pub async fn list(&self) -> Result<Vec<ParentAssignment>> {
        let assignments = sqlx::query_as::<_, ParentAssignment>(
            r#"
            SELECT id, parent_id, student_id, created_at
            FROM parent_assignments
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    pub async fn students_for_parent(&self, parent_id: Uuid) -> Result<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT s.id, s.name, s.age, s.gender, s.access_number, s.admission_id,
                   s.class_name, s.stream, s.sponsorship_status, s.needs_sponsorship,
                   s.sponsorship_story, s.admitted_by, s.parent_name, s.parent_phone,
                   s.parent_email, s.address, s.photo_url, s.family_photo_url,
                   s.passport_photo_url, s.total_fees, s.paid_amount, s.balance,
                   s.payment_status, s.created_at, s.updated_at
            FROM students s
            JOIN parent_assignments pa ON pa.student_id = s.id
            WHERE pa.parent_id = $1
            ORDER BY s.name
            "#,
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    pub async fn delete(&self, parent_id: Uuid, student_id: Uuid) -> Result<()> {
        let res = sqlx::query(
            "DELETE FROM parent_assignments WHERE parent_id = $1 AND student_id = $2",
        )
        .bind(parent_id)
        .bind(student_id)
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Assignment not found".to_string()));
        }
        Ok(())
    }
}
