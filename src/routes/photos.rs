use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::dto::photo_dto::UploadPhotoPayload;
use crate::error::Result;
use crate::models::photo::PhotoCategory;
use crate::utils::validation::validate;
use crate::AppState;

pub async fn list_photos(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse> {
    let photos = state.photo_service.list().await?;
    Ok(Json(photos))
}

pub async fn photo_stats(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse> {
    let stats = state.photo_service.stats().await?;
    Ok(Json(stats))
}

async fn upload_photo(
    state: AppState,
    category: PhotoCategory,
    id: Uuid,
    payload: UploadPhotoPayload,
) -> Result<impl axum::response::IntoResponse> {
    validate(&payload)?;
    let response = state.photo_service.upload(category, id, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

// The category segment is a closed set, registered as static routes so the
// filename-keyed delete route can share the /api/photos prefix.

pub async fn upload_profile_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UploadPhotoPayload>,
) -> Result<impl axum::response::IntoResponse> {
    upload_photo(state, PhotoCategory::Profile, id, payload).await
}

pub async fn upload_family_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UploadPhotoPayload>,
) -> Result<impl axum::response::IntoResponse> {
    upload_photo(state, PhotoCategory::Family, id, payload).await
}

pub async fn upload_passport_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UploadPhotoPayload>,
) -> Result<impl axum::response::IntoResponse> {
    upload_photo(state, PhotoCategory::Passport, id, payload).await
}

pub async fn delete_photo(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl axum::response::IntoResponse> {
    state.photo_service.delete(&filename).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn cleanup_orphaned_photos(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse> {
    let result = state.photo_service.cleanup_orphaned().await?;
    Ok(Json(result))
}
