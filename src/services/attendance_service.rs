use crate::dto::attendance_dto::{
    AttendanceQuery, AttendanceSummary, MarkAttendancePayload, UpdateAttendancePayload,
};
use crate::error::{Error, Result};
use crate::models::attendance::{AttendanceRecord, AttendanceStatus};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

const ATTENDANCE_COLUMNS: &str = "id, student_id, date, status, time, teacher_id, remarks, notification_sent, created_at, updated_at";

/// Recency of a record: updated_at, else created_at, else midnight of its date.
pub fn recency_key(record: &AttendanceRecord) -> DateTime<Utc> {
    record
        .updated_at
        .or(record.created_at)
        .unwrap_or_else(|| record.date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Collapse duplicates down to the most recent record per student per day.
/// New writes are upserted so duplicates cannot be created anymore, but legacy
/// rows may still hold several records for one student and day.
pub fn resolve_current(records: Vec<AttendanceRecord>) -> Vec<AttendanceRecord> {
    let mut latest: HashMap<(Uuid, NaiveDate), AttendanceRecord> = HashMap::new();
    for record in records {
        let key = (record.student_id, record.date);
        match latest.get(&key) {
            Some(existing) if recency_key(existing) >= recency_key(&record) => {}
            _ => {
                latest.insert(key, record);
            }
        }
    }
    let mut resolved: Vec<AttendanceRecord> = latest.into_values().collect();
    resolved.sort_by(|a, b| (a.date, a.student_id).cmp(&(b.date, b.student_id)));
    resolved
}

#[derive(Clone)]
pub struct AttendanceService {
    pool: PgPool,
}

impl AttendanceService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert on (student_id, date): marking twice for the same day replaces
    /// the earlier record instead of creating a duplicate.
    pub async fn mark(&self, payload: MarkAttendancePayload) -> Result<AttendanceRecord> {
        let status: AttendanceStatus = payload
            .status
            .parse()
            .map_err(Error::BadRequest)?;

        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            INSERT INTO attendance (student_id, date, status, time, teacher_id, remarks)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (student_id, date) DO UPDATE SET
                status = EXCLUDED.status,
                time = EXCLUDED.time,
                teacher_id = EXCLUDED.teacher_id,
                remarks = EXCLUDED.remarks,
                updated_at = NOW()
            RETURNING {}
            "#,
            ATTENDANCE_COLUMNS
        ))
        .bind(payload.student_id)
        .bind(payload.date)
        .bind(status.as_str())
        .bind(payload.time)
        .bind(payload.teacher_id)
        .bind(&payload.remarks)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateAttendancePayload) -> Result<AttendanceRecord> {
        let current = sqlx::query_as::<_, AttendanceRecord>(&format!(
            "SELECT {} FROM attendance WHERE id = $1",
            ATTENDANCE_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        let status = match payload.status {
            Some(raw) => raw.parse::<AttendanceStatus>().map_err(Error::BadRequest)?,
            None => current.status.parse().map_err(Error::BadRequest)?,
        };

        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            UPDATE attendance
            SET status = $2, time = $3, remarks = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ATTENDANCE_COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(payload.time.or(current.time))
        .bind(payload.remarks.or(current.remarks))
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn list(&self, query: AttendanceQuery) -> Result<Vec<AttendanceRecord>> {
        let mut filters = Vec::new();
        let mut bind_index = 0;

        if query.date.is_some() {
            bind_index += 1;
            filters.push(format!("a.date = ${}", bind_index));
        }
        if query.class_name.is_some() {
            bind_index += 1;
            filters.push(format!("s.class_name = ${}", bind_index));
        }
        if query.student_id.is_some() {
            bind_index += 1;
            filters.push(format!("a.student_id = ${}", bind_index));
        }

        let where_clause = if filters.is_empty() {
            "".to_string()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let sql = format!(
            r#"
            SELECT a.id, a.student_id, a.date, a.status, a.time, a.teacher_id,
                   a.remarks, a.notification_sent, a.created_at, a.updated_at
            FROM attendance a
            JOIN students s ON s.id = a.student_id
            {}
            ORDER BY a.date, a.student_id
            "#,
            where_clause
        );

        let mut statement = sqlx::query_as::<_, AttendanceRecord>(&sql);
        if let Some(date) = query.date {
            statement = statement.bind(date);
        }
        if let Some(class_name) = &query.class_name {
            statement = statement.bind(class_name);
        }
        if let Some(student_id) = query.student_id {
            statement = statement.bind(student_id);
        }
        let records = statement.fetch_all(&self.pool).await?;

        Ok(resolve_current(records))
    }

    pub async fn summary(&self, date: NaiveDate, class_name: Option<String>) -> Result<AttendanceSummary> {
        let records = self
            .list(AttendanceQuery {
                date: Some(date),
                class_name,
                student_id: None,
            })
            .await?;

        let mut summary = AttendanceSummary {
            date,
            ..Default::default()
        };
        for record in &records {
            match record.status.parse::<AttendanceStatus>() {
                Ok(AttendanceStatus::Present) => summary.present += 1,
                Ok(AttendanceStatus::Late) => summary.late += 1,
                Ok(AttendanceStatus::Absent) => summary.absent += 1,
                Ok(AttendanceStatus::Holiday) => summary.holiday += 1,
                Err(_) => {}
            }
        }

        Ok(summary)
    }
}
