use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::dto::attendance_dto::{AttendanceQuery, MarkAttendancePayload, UpdateAttendancePayload};
use crate::error::{Error, Result};
use crate::utils::validation::validate;
use crate::AppState;

pub async fn list_attendance(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> Result<impl axum::response::IntoResponse> {
    let records = state.attendance_service.list(query).await?;
    Ok(Json(records))
}

pub async fn mark_attendance(
    State(state): State<AppState>,
    Json(payload): Json<MarkAttendancePayload>,
) -> Result<impl axum::response::IntoResponse> {
    validate(&payload)?;
    let record = state.attendance_service.mark(payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_attendance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAttendancePayload>,
) -> Result<impl axum::response::IntoResponse> {
    let record = state.attendance_service.update(id, payload).await?;
    Ok(Json(record))
}

pub async fn attendance_summary(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> Result<impl axum::response::IntoResponse> {
    let date = query
        .date
        .ok_or_else(|| Error::BadRequest("date query parameter is required".to_string()))?;
    let summary = state
        .attendance_service
        .summary(date, query.class_name)
        .await?;
    Ok(Json(summary))
}
