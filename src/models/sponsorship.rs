use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sponsorship {
    pub id: Uuid,
    pub student_id: Uuid,
    pub sponsor_id: Uuid,
    pub sponsor_name: String,
    pub sponsor_email: String,
    pub sponsor_phone: Option<String>,
    pub amount: Decimal,
    pub duration_months: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub payment_schedule: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
