use crate::dto::sponsorship_dto::{
    CreateSponsorshipPayload, SponsorshipListQuery, UpdateSponsorshipPayload,
};
use crate::error::{Error, Result};
use crate::models::sponsorship::Sponsorship;
use crate::workflow::{self, ReviewAction, Role, SponsorshipStatus, StudentStatus};
use chrono::Months;
use sqlx::PgPool;
use uuid::Uuid;

const SPONSORSHIP_COLUMNS: &str = "id, student_id, sponsor_id, sponsor_name, sponsor_email, sponsor_phone, amount, duration_months, start_date, end_date, status, payment_schedule, created_at, updated_at";

#[derive(Clone)]
pub struct SponsorshipService {
    pool: PgPool,
}

impl SponsorshipService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A sponsor claims a student from the pool. The student row is locked for
    /// the duration so two concurrent requests cannot both pass the live-claim
    /// check.
    pub async fn request(
        &self,
        payload: CreateSponsorshipPayload,
        actor: Role,
    ) -> Result<Sponsorship> {
        let mut tx = self.pool.begin().await?;

        let student_status: String = sqlx::query_scalar(
            "SELECT sponsorship_status FROM students WHERE id = $1 FOR UPDATE",
        )
        .bind(payload.student_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Student not found".to_string()))?;

        let has_live: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM sponsorships
                WHERE student_id = $1
                  AND status IN ('pending', 'coordinator-approved', 'sponsored')
            )
            "#,
        )
        .bind(payload.student_id)
        .fetch_one(&mut *tx)
        .await?;

        let status: StudentStatus = student_status.parse()?;
        workflow::authorize_request(status, has_live, actor)?;

        let end_date = payload
            .start_date
            .checked_add_months(Months::new(payload.duration_months as u32))
            .ok_or_else(|| Error::BadRequest("Sponsorship end date out of range".to_string()))?;

        let sponsorship = sqlx::query_as::<_, Sponsorship>(&format!(
            r#"
            INSERT INTO sponsorships (
                student_id, sponsor_id, sponsor_name, sponsor_email, sponsor_phone,
                amount, duration_months, start_date, end_date, status, payment_schedule
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,'pending',$10)
            RETURNING {}
            "#,
            SPONSORSHIP_COLUMNS
        ))
        .bind(payload.student_id)
        .bind(payload.sponsor_id)
        .bind(&payload.sponsor_name)
        .bind(&payload.sponsor_email)
        .bind(&payload.sponsor_phone)
        .bind(payload.amount)
        .bind(payload.duration_months)
        .bind(payload.start_date)
        .bind(end_date)
        .bind(
            payload
                .payment_schedule
                .unwrap_or_else(|| "monthly".to_string()),
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            sponsorship_id = %sponsorship.id,
            student_id = %sponsorship.student_id,
            sponsor_id = %sponsorship.sponsor_id,
            "sponsorship requested"
        );

        Ok(sponsorship)
    }

    /// Approve or reject a sponsorship. The sponsorship-side and student-side
    /// effects commit in one transaction; a failure of either leaves both
    /// records untouched.
    pub async fn review(&self, id: Uuid, action: ReviewAction, actor: Role) -> Result<Sponsorship> {
        let mut tx = self.pool.begin().await?;

        let current: Sponsorship = sqlx::query_as::<_, Sponsorship>(&format!(
            "SELECT {} FROM sponsorships WHERE id = $1 FOR UPDATE",
            SPONSORSHIP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Sponsorship not found".to_string()))?;

        let current_status: SponsorshipStatus = current.status.parse()?;
        let transition = workflow::review_sponsorship(current_status, action, actor)?;

        let sponsorship = sqlx::query_as::<_, Sponsorship>(&format!(
            r#"
            UPDATE sponsorships
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SPONSORSHIP_COLUMNS
        ))
        .bind(id)
        .bind(transition.sponsorship_status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE students
            SET sponsorship_status = $2,
                admitted_by = COALESCE($3, admitted_by),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(current.student_id)
        .bind(transition.student_status.as_str())
        .bind(transition.admitted_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            sponsorship_id = %id,
            student_id = %current.student_id,
            from = %current_status,
            to = %transition.sponsorship_status,
            actor = %actor,
            "sponsorship reviewed"
        );

        Ok(sponsorship)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Sponsorship> {
        let sponsorship = sqlx::query_as::<_, Sponsorship>(&format!(
            "SELECT {} FROM sponsorships WHERE id = $1",
            SPONSORSHIP_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(sponsorship)
    }

    pub async fn list(&self, query: SponsorshipListQuery) -> Result<Vec<Sponsorship>> {
        let mut filters = Vec::new();
        let mut bind_index = 0;

        if query.status.is_some() {
            bind_index += 1;
            filters.push(format!("status = ${}", bind_index));
        }
        if query.student_id.is_some() {
            bind_index += 1;
            filters.push(format!("student_id = ${}", bind_index));
        }
        if query.sponsor_id.is_some() {
            bind_index += 1;
            filters.push(format!("sponsor_id = ${}", bind_index));
        }

        let where_clause = if filters.is_empty() {
            "".to_string()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let sql = format!(
            "SELECT {} FROM sponsorships {} ORDER BY created_at DESC",
            SPONSORSHIP_COLUMNS, where_clause
        );

        let mut statement = sqlx::query_as::<_, Sponsorship>(&sql);
        if let Some(status) = &query.status {
            statement = statement.bind(status);
        }
        if let Some(student_id) = query.student_id {
            statement = statement.bind(student_id);
        }
        if let Some(sponsor_id) = query.sponsor_id {
            statement = statement.bind(sponsor_id);
        }
        let sponsorships = statement.fetch_all(&self.pool).await?;

        Ok(sponsorships)
    }

    /// Contact and payment details only; the status field is owned by the
    /// workflow and cannot be written here.
    pub async fn update(&self, id: Uuid, payload: UpdateSponsorshipPayload) -> Result<Sponsorship> {
        let current = self.get_by_id(id).await?;

        let sponsorship = sqlx::query_as::<_, Sponsorship>(&format!(
            r#"
            UPDATE sponsorships
            SET sponsor_name = $2,
                sponsor_email = $3,
                sponsor_phone = $4,
                amount = $5,
                payment_schedule = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SPONSORSHIP_COLUMNS
        ))
        .bind(id)
        .bind(payload.sponsor_name.unwrap_or(current.sponsor_name))
        .bind(payload.sponsor_email.unwrap_or(current.sponsor_email))
        .bind(payload.sponsor_phone.or(current.sponsor_phone))
        .bind(payload.amount.unwrap_or(current.amount))
        .bind(payload.payment_schedule.unwrap_or(current.payment_schedule))
        .fetch_one(&self.pool)
        .await?;

        Ok(sponsorship)
    }

    pub async fn status_counts(&self) -> Result<std::collections::HashMap<String, i64>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM sponsorships GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }
}
