use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::dto::assignment_dto::CreateAssignmentPayload;
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::workflow::Role;
use crate::AppState;

pub async fn list_assignments(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse> {
    let assignments = state.assignment_service.list().await?;
    Ok(Json(assignments))
}

pub async fn create_assignment(
    State(state): State<AppState>,
    Json(payload): Json<CreateAssignmentPayload>,
) -> Result<impl axum::response::IntoResponse> {
    let assignment = state
        .assignment_service
        .create(payload.parent_id, payload.student_id)
        .await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

pub async fn students_for_parent(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(parent_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse> {
    // Parents see their own assignments; anyone else needs the admin role.
    let is_self = claims.sub.parse::<Uuid>().ok() == Some(parent_id);
    if !is_self && claims.actor_role().ok() != Some(Role::Admin) {
        return Err(Error::Forbidden(
            "May only view your own assigned students".to_string(),
        ));
    }
    let students = state.assignment_service.students_for_parent(parent_id).await?;
    Ok(Json(students))
}

pub async fn delete_assignment(
    State(state): State<AppState>,
    Path((parent_id, student_id)): Path<(Uuid, Uuid)>,
) -> Result<impl axum::response::IntoResponse> {
    state.assignment_service.delete(parent_id, student_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
