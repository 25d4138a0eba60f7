use crate::dto::student_dto::{CreateStudentPayload, StudentListQuery, UpdateStudentPayload};
use crate::error::Result;
use crate::models::student::Student;
use crate::workflow::{self, EligibilityAction, Role, StudentStatus};
use rand::distributions::Alphanumeric;
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::postgres::PgQueryResult;
use sqlx::PgPool;
use uuid::Uuid;

const STUDENT_COLUMNS: &str = "id, name, age, gender, access_number, admission_id, class_name, stream, sponsorship_status, needs_sponsorship, sponsorship_story, admitted_by, parent_name, parent_phone, parent_email, address, photo_url, family_photo_url, passport_photo_url, total_fees, paid_amount, balance, payment_status, created_at, updated_at";

#[derive(Clone)]
pub struct StudentService {
    pool: PgPool,
}

/// Derived from fees on every write so it can never drift from the amounts.
pub fn payment_status_for(total_fees: Decimal, paid_amount: Decimal) -> &'static str {
    if total_fees > Decimal::ZERO && paid_amount >= total_fees {
        "paid"
    } else if paid_amount > Decimal::ZERO {
        "partial"
    } else {
        "unpaid"
    }
}

fn generate_access_number() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect();
    format!("AC-{}", suffix)
}

impl StudentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateStudentPayload) -> Result<Student> {
        let total_fees = payload.total_fees.unwrap_or(Decimal::ZERO);
        let paid_amount = payload.paid_amount.unwrap_or(Decimal::ZERO);
        let balance = total_fees - paid_amount;
        let payment_status = payment_status_for(total_fees, paid_amount);
        let sponsorship_status = if payload.needs_sponsorship {
            StudentStatus::EligibilityCheck
        } else {
            StudentStatus::None
        };

        let student = sqlx::query_as::<_, Student>(&format!(
            r#"
            INSERT INTO students (
                name, age, gender, access_number, admission_id, class_name, stream,
                sponsorship_status, needs_sponsorship, sponsorship_story,
                parent_name, parent_phone, parent_email, address,
                total_fees, paid_amount, balance, payment_status
            ) VALUES (
                $1,$2,$3,$4,$5,$6,$7,
                $8,$9,$10,
                $11,$12,$13,$14,
                $15,$16,$17,$18
            )
            RETURNING {}
            "#,
            STUDENT_COLUMNS
        ))
        .bind(&payload.name)
        .bind(payload.age)
        .bind(&payload.gender)
        .bind(generate_access_number())
        .bind(&payload.admission_id)
        .bind(&payload.class_name)
        .bind(&payload.stream)
        .bind(sponsorship_status.as_str())
        .bind(payload.needs_sponsorship)
        .bind(&payload.sponsorship_story)
        .bind(&payload.parent_name)
        .bind(&payload.parent_phone)
        .bind(&payload.parent_email)
        .bind(&payload.address)
        .bind(total_fees)
        .bind(paid_amount)
        .bind(balance)
        .bind(payment_status)
        .fetch_one(&self.pool)
        .await?;

        Ok(student)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Student> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE id = $1",
            STUDENT_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(student)
    }

    pub async fn list(&self, query: StudentListQuery) -> Result<Vec<Student>> {
        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(class_name) = query.class_name {
            filters.push(format!("class_name = ${}", args.len() + 1));
            args.push(class_name);
        }
        if let Some(stream) = query.stream {
            filters.push(format!("stream = ${}", args.len() + 1));
            args.push(stream);
        }
        if let Some(status) = query.sponsorship_status {
            filters.push(format!("sponsorship_status = ${}", args.len() + 1));
            args.push(status);
        }
        if let Some(search) = query.search {
            let first = args.len() + 1;
            let second = first + 1;
            filters.push(format!(
                "(name ILIKE ${} OR access_number ILIKE ${})",
                first, second
            ));
            args.push(format!("%{}%", search.clone()));
            args.push(format!("%{}%", search));
        }

        let where_clause = if filters.is_empty() {
            "".to_string()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let items_query = format!(
            "SELECT {} FROM students {} ORDER BY created_at DESC",
            STUDENT_COLUMNS, where_clause
        );

        let mut statement = sqlx::query_as::<_, Student>(&items_query);
        for value in &args {
            statement = statement.bind(value);
        }
        let students = statement.fetch_all(&self.pool).await?;

        Ok(students)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateStudentPayload) -> Result<Student> {
        let current = self.get_by_id(id).await?;

        let total_fees = payload.total_fees.unwrap_or(current.total_fees);
        let paid_amount = payload.paid_amount.unwrap_or(current.paid_amount);
        let balance = total_fees - paid_amount;
        let payment_status = payment_status_for(total_fees, paid_amount);

        let student = sqlx::query_as::<_, Student>(&format!(
            r#"
            UPDATE students
            SET
                name = $2,
                age = $3,
                gender = $4,
                admission_id = $5,
                class_name = $6,
                stream = $7,
                needs_sponsorship = $8,
                sponsorship_story = $9,
                parent_name = $10,
                parent_phone = $11,
                parent_email = $12,
                address = $13,
                total_fees = $14,
                paid_amount = $15,
                balance = $16,
                payment_status = $17,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            STUDENT_COLUMNS
        ))
        .bind(id)
        .bind(payload.name.unwrap_or(current.name))
        .bind(payload.age.unwrap_or(current.age))
        .bind(payload.gender.unwrap_or(current.gender))
        .bind(payload.admission_id.or(current.admission_id))
        .bind(payload.class_name.unwrap_or(current.class_name))
        .bind(payload.stream.or(current.stream))
        .bind(payload.needs_sponsorship.unwrap_or(current.needs_sponsorship))
        .bind(payload.sponsorship_story.or(current.sponsorship_story))
        .bind(payload.parent_name.or(current.parent_name))
        .bind(payload.parent_phone.or(current.parent_phone))
        .bind(payload.parent_email.or(current.parent_email))
        .bind(payload.address.or(current.address))
        .bind(total_fees)
        .bind(paid_amount)
        .bind(balance)
        .bind(payment_status)
        .fetch_one(&self.pool)
        .await?;

        Ok(student)
    }

    pub async fn delete(&self, id: Uuid) -> Result<PgQueryResult> {
        let res = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(res)
    }

    /// The pool a sponsor may pick from: status is available-for-sponsors and
    /// no sponsorship record holds a live claim on the student.
    pub async fn list_available_for_sponsors(&self) -> Result<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(&format!(
            r#"
            SELECT {} FROM students s
            WHERE s.sponsorship_status = 'available-for-sponsors'
              AND NOT EXISTS (
                  SELECT 1 FROM sponsorships sp
                  WHERE sp.student_id = s.id
                    AND sp.status IN ('pending', 'coordinator-approved', 'sponsored')
              )
            ORDER BY s.created_at DESC
            "#,
            STUDENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    /// Overseer decision on a student's eligibility stage.
    pub async fn review_eligibility(
        &self,
        id: Uuid,
        action: EligibilityAction,
        actor: Role,
    ) -> Result<Student> {
        let current = self.get_by_id(id).await?;
        let current_status: StudentStatus = current.sponsorship_status.parse()?;
        let next = workflow::review_eligibility(current_status, action, actor)?;

        let student = sqlx::query_as::<_, Student>(&format!(
            r#"
            UPDATE students
            SET sponsorship_status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            STUDENT_COLUMNS
        ))
        .bind(id)
        .bind(next.as_str())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            student_id = %id,
            from = %current_status,
            to = %next,
            actor = %actor,
            "eligibility reviewed"
        );

        Ok(student)
    }

    pub async fn status_counts(&self) -> Result<std::collections::HashMap<String, i64>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT sponsorship_status, COUNT(*)
            FROM students
            GROUP BY sponsorship_status
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    pub async fn count(&self) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
