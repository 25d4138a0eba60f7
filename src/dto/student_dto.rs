use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateStudentPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 2, max = 30))]
    pub age: i32,
    #[validate(length(min = 1))]
    pub gender: String,
    pub admission_id: Option<String>,
    #[validate(length(min = 1))]
    pub class_name: String,
    pub stream: Option<String>,
    #[serde(default)]
    pub needs_sponsorship: bool,
    pub sponsorship_story: Option<String>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    #[validate(email)]
    pub parent_email: Option<String>,
    pub address: Option<String>,
    pub total_fees: Option<Decimal>,
    pub paid_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStudentPayload {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(range(min = 2, max = 30))]
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub admission_id: Option<String>,
    #[validate(length(min = 1))]
    pub class_name: Option<String>,
    pub stream: Option<String>,
    pub needs_sponsorship: Option<bool>,
    pub sponsorship_story: Option<String>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    #[validate(email)]
    pub parent_email: Option<String>,
    pub address: Option<String>,
    pub total_fees: Option<Decimal>,
    pub paid_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StudentListQuery {
    pub class_name: Option<String>,
    pub stream: Option<String>,
    pub sponsorship_status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityReviewPayload {
    pub action: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub students_total: i64,
    pub sponsorship_status_counts: std::collections::HashMap<String, i64>,
}
