use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::dto::sponsorship_dto::{
    CreateSponsorshipPayload, SponsorshipListQuery, UpdateSponsorshipPayload,
};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::utils::validation::validate;
use crate::workflow::ReviewAction;
use crate::AppState;

pub async fn list_sponsorships(
    State(state): State<AppState>,
    Query(query): Query<SponsorshipListQuery>,
) -> Result<impl axum::response::IntoResponse> {
    let sponsorships = state.sponsorship_service.list(query).await?;
    Ok(Json(sponsorships))
}

pub async fn request_sponsorship(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateSponsorshipPayload>,
) -> Result<impl axum::response::IntoResponse> {
    validate(&payload)?;
    let actor = claims.actor_role()?;
    let sponsorship = state.sponsorship_service.request(payload, actor).await?;
    Ok((StatusCode::CREATED, Json(sponsorship)))
}

pub async fn get_sponsorship(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse> {
    let sponsorship = state.sponsorship_service.get_by_id(id).await?;
    Ok(Json(sponsorship))
}

pub async fn update_sponsorship(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSponsorshipPayload>,
) -> Result<impl axum::response::IntoResponse> {
    validate(&payload)?;
    let sponsorship = state.sponsorship_service.update(id, payload).await?;
    Ok(Json(sponsorship))
}

pub async fn approve_sponsorship(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse> {
    let actor = claims.actor_role()?;
    let sponsorship = state
        .sponsorship_service
        .review(id, ReviewAction::Approve, actor)
        .await?;
    Ok(Json(sponsorship))
}

pub async fn reject_sponsorship(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse> {
    let actor = claims.actor_role()?;
    let sponsorship = state
        .sponsorship_service
        .review(id, ReviewAction::Reject, actor)
        .await?;
    Ok(Json(sponsorship))
}
