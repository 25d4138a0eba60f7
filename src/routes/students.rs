use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::dto::student_dto::{
    CreateStudentPayload, DashboardStats, EligibilityReviewPayload, StudentListQuery,
    UpdateStudentPayload,
};
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::utils::validation::validate;
use crate::workflow::EligibilityAction;
use crate::AppState;

pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<StudentListQuery>,
) -> Result<impl axum::response::IntoResponse> {
    let students = state.student_service.list(query).await?;
    Ok(Json(students))
}

pub async fn create_student(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateStudentPayload>,
) -> Result<impl axum::response::IntoResponse> {
    validate(&payload)?;

    if !state.admit_guard.try_acquire(&claims.sub) {
        return Err(Error::Conflict(
            "An admission was just submitted; wait a moment before retrying".to_string(),
        ));
    }

    let student = state.student_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse> {
    let student = state.student_service.get_by_id(id).await?;
    Ok(Json(student))
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStudentPayload>,
) -> Result<impl axum::response::IntoResponse> {
    validate(&payload)?;
    let student = state.student_service.update(id, payload).await?;
    Ok(Json(student))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse> {
    if claims.actor_role()? != crate::workflow::Role::Admin {
        return Err(Error::Forbidden(
            "Only an admin may delete a student".to_string(),
        ));
    }
    state.student_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_available_students(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse> {
    let students = state.student_service.list_available_for_sponsors().await?;
    Ok(Json(students))
}

pub async fn review_eligibility(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EligibilityReviewPayload>,
) -> Result<impl axum::response::IntoResponse> {
    let action: EligibilityAction = payload.action.parse::<EligibilityAction>()?;
    let actor = claims.actor_role()?;
    let student = state
        .student_service
        .review_eligibility(id, action, actor)
        .await?;
    Ok(Json(student))
}

pub async fn get_dashboard_stats(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse> {
    let students_total = state.student_service.count().await?;
    let sponsorship_status_counts = state.student_service.status_counts().await?;
    Ok(Json(DashboardStats {
        students_total,
        sponsorship_status_counts,
    }))
}
