use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSponsorshipPayload {
    pub student_id: Uuid,
    pub sponsor_id: Uuid,
    #[validate(length(min = 1))]
    pub sponsor_name: String,
    #[validate(email)]
    pub sponsor_email: String,
    pub sponsor_phone: Option<String>,
    pub amount: Decimal,
    /// Months, not days. End date is computed with calendar month arithmetic.
    #[validate(range(min = 1, max = 120))]
    pub duration_months: i32,
    pub start_date: NaiveDate,
    pub payment_schedule: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateSponsorshipPayload {
    #[validate(length(min = 1))]
    pub sponsor_name: Option<String>,
    #[validate(email)]
    pub sponsor_email: Option<String>,
    pub sponsor_phone: Option<String>,
    pub amount: Option<Decimal>,
    pub payment_schedule: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SponsorshipListQuery {
    pub status: Option<String>,
    pub student_id: Option<Uuid>,
    pub sponsor_id: Option<Uuid>,
}
