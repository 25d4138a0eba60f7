use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub access_number: String,
    pub admission_id: Option<String>,
    pub class_name: String,
    pub stream: Option<String>,
    pub sponsorship_status: String,
    pub needs_sponsorship: bool,
    pub sponsorship_story: Option<String>,
    pub admitted_by: Option<String>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    pub parent_email: Option<String>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
    pub family_photo_url: Option<String>,
    pub passport_photo_url: Option<String>,
    pub total_fees: Decimal,
    pub paid_amount: Decimal,
    pub balance: Decimal,
    pub payment_status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
