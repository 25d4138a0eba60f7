use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadPhotoPayload {
    /// Data URL, e.g. "data:image/png;base64,...."
    #[validate(length(min = 1))]
    pub file_data: String,
    #[validate(length(min = 1))]
    pub file_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhotoUploadResponse {
    pub filename: String,
    pub url: String,
    pub size_bytes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhotoCategoryStats {
    pub category: String,
    pub count: i64,
    pub total_bytes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhotoStatsResponse {
    pub total: i64,
    pub total_bytes: i64,
    pub categories: Vec<PhotoCategoryStats>,
    pub orphaned: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanupResponse {
    pub removed: i64,
}
