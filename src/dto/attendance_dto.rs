use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MarkAttendancePayload {
    pub student_id: Uuid,
    pub date: NaiveDate,
    #[validate(length(min = 1))]
    pub status: String,
    pub time: Option<NaiveTime>,
    pub teacher_id: Option<Uuid>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAttendancePayload {
    pub status: Option<String>,
    pub time: Option<NaiveTime>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AttendanceQuery {
    pub date: Option<NaiveDate>,
    pub class_name: Option<String>,
    pub student_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct AttendanceSummary {
    pub date: NaiveDate,
    pub present: i64,
    pub late: i64,
    pub absent: i64,
    pub holiday: i64,
}
