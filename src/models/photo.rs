use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Photo {
    pub filename: String,
    pub category: String,
    pub student_id: Uuid,
    pub mime_type: String,
    pub size_bytes: i64,
    pub created_at: Option<DateTime<Utc>>,
}

/// Which student field a photo category maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoCategory {
    Profile,
    Family,
    Passport,
}

impl PhotoCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoCategory::Profile => "profile",
            PhotoCategory::Family => "family",
            PhotoCategory::Passport => "passport",
        }
    }

    pub fn student_column(&self) -> &'static str {
        match self {
            PhotoCategory::Profile => "photo_url",
            PhotoCategory::Family => "family_photo_url",
            PhotoCategory::Passport => "passport_photo_url",
        }
    }
}

impl std::str::FromStr for PhotoCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "profile" => Ok(PhotoCategory::Profile),
            "family" => Ok(PhotoCategory::Family),
            "passport" => Ok(PhotoCategory::Passport),
            other => Err(format!("unknown photo category '{}'", other)),
        }
    }
}
