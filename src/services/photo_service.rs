use crate::dto::photo_dto::{
    CleanupResponse, PhotoCategoryStats, PhotoStatsResponse, PhotoUploadResponse,
    UploadPhotoPayload,
};
use crate::error::{Error, Result};
use crate::models::photo::{Photo, PhotoCategory};
use base64::Engine;
use sqlx::PgPool;
use tokio::fs;
use uuid::Uuid;

pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_MIME_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Clone)]
pub struct ParsedPhoto {
    pub mime_type: String,
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

fn magic_bytes_match(mime: &str, data: &[u8]) -> bool {
    match mime {
        "image/jpeg" => data.starts_with(&[0xFF, 0xD8]),
        "image/png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47]),
        "image/gif" => data.starts_with(b"GIF8"),
        "image/webp" => data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP",
        _ => false,
    }
}

/// Validate and decode a `data:<mime>;base64,<payload>` upload. Everything is
/// checked before any file or database I/O: MIME allow-list, declared type
/// matching the data URL, decoded size ceiling, and leading magic bytes.
pub fn parse_data_url(file_data: &str, declared_type: &str) -> Result<ParsedPhoto> {
    let declared = declared_type.trim().to_ascii_lowercase();
    if !ALLOWED_MIME_TYPES.contains(&declared.as_str()) {
        return Err(Error::BadRequest(format!(
            "File type '{}' is not allowed",
            declared_type
        )));
    }

    let rest = file_data
        .strip_prefix("data:")
        .ok_or_else(|| Error::BadRequest("Expected a data URL".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::BadRequest("Malformed data URL".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| Error::BadRequest("Data URL must be base64 encoded".to_string()))?
        .to_ascii_lowercase();

    if mime != declared {
        return Err(Error::BadRequest(format!(
            "Declared type '{}' does not match data URL type '{}'",
            declared, mime
        )));
    }

    // Cheap pre-check so a huge payload is refused before decoding it all.
    // Measured on the trimmed payload, the same text the decoder sees.
    let payload = payload.trim();
    if payload.len() / 4 * 3 > MAX_PHOTO_BYTES {
        return Err(Error::BadRequest(format!(
            "Photo exceeds the {} MB limit",
            MAX_PHOTO_BYTES / (1024 * 1024)
        )));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| Error::BadRequest(format!("Invalid base64 payload: {}", e)))?;

    if bytes.len() > MAX_PHOTO_BYTES {
        return Err(Error::BadRequest(format!(
            "Photo exceeds the {} MB limit",
            MAX_PHOTO_BYTES / (1024 * 1024)
        )));
    }
    if !magic_bytes_match(&mime, &bytes) {
        return Err(Error::BadRequest(format!(
            "File content does not look like {}",
            mime
        )));
    }

    Ok(ParsedPhoto {
        extension: extension_for(&mime),
        mime_type: mime,
        bytes,
    })
}

#[derive(Clone)]
pub struct PhotoService {
    pool: PgPool,
    uploads_dir: String,
}

impl PhotoService {
    pub fn new(pool: PgPool, uploads_dir: String) -> Self {
        Self { pool, uploads_dir }
    }

    pub async fn upload(
        &self,
        category: PhotoCategory,
        student_id: Uuid,
        payload: UploadPhotoPayload,
    ) -> Result<PhotoUploadResponse> {
        let parsed = parse_data_url(&payload.file_data, &payload.file_type)?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM students WHERE id = $1)")
                .bind(student_id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(Error::NotFound("Student not found".to_string()));
        }

        let dir = format!("{}/{}", self.uploads_dir, category.as_str());
        fs::create_dir_all(&dir).await?;

        let filename = format!("{}.{}", Uuid::new_v4(), parsed.extension);
        let path = format!("{}/{}", dir, filename);
        fs::write(&path, &parsed.bytes).await.map_err(|e| {
            tracing::error!("Failed to write photo file: {}", e);
            Error::Internal(format!("Failed to save photo: {}", e))
        })?;

        let size_bytes = parsed.bytes.len() as i64;
        let url = format!("/uploads/{}/{}", category.as_str(), filename);

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO photos (filename, category, student_id, mime_type, size_bytes)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&filename)
        .bind(category.as_str())
        .bind(student_id)
        .bind(&parsed.mime_type)
        .bind(size_bytes)
        .execute(&mut *tx)
        .await?;

        sqlx::query(&format!(
            "UPDATE students SET {} = $2, updated_at = NOW() WHERE id = $1",
            category.student_column()
        ))
        .bind(student_id)
        .bind(&url)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::info!(%student_id, category = category.as_str(), filename = %filename, "photo uploaded");

        Ok(PhotoUploadResponse {
            filename,
            url,
            size_bytes,
        })
    }

    pub async fn list(&self) -> Result<Vec<Photo>> {
        let photos = sqlx::query_as::<_, Photo>(
            r#"
            SELECT filename, category, student_id, mime_type, size_bytes, created_at
            FROM photos
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(photos)
    }

    pub async fn stats(&self) -> Result<PhotoStatsResponse> {
        let rows = sqlx::query_as::<_, (String, i64, i64)>(
            r#"
            SELECT category, COUNT(*), COALESCE(SUM(size_bytes), 0)::bigint
            FROM photos
            GROUP BY category
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let orphaned = self.count_orphaned().await?;

        let mut total = 0;
        let mut total_bytes = 0;
        let categories = rows
            .into_iter()
            .map(|(category, count, bytes)| {
                total += count;
                total_bytes += bytes;
                PhotoCategoryStats {
                    category,
                    count,
                    total_bytes: bytes,
                }
            })
            .collect();

        Ok(PhotoStatsResponse {
            total,
            total_bytes,
            categories,
            orphaned,
        })
    }

    pub async fn delete(&self, filename: &str) -> Result<()> {
        let photo = sqlx::query_as::<_, Photo>(
            r#"
            SELECT filename, category, student_id, mime_type, size_bytes, created_at
            FROM photos
            WHERE filename = $1
            "#,
        )
        .bind(filename)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Photo not found".to_string()))?;

        let category: PhotoCategory = photo.category.parse().map_err(Error::Internal)?;
        let url = format!("/uploads/{}/{}", photo.category, photo.filename);

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM photos WHERE filename = $1")
            .bind(filename)
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!(
            "UPDATE students SET {col} = NULL, updated_at = NOW() WHERE id = $1 AND {col} = $2",
            col = category.student_column()
        ))
        .bind(photo.student_id)
        .bind(&url)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        let path = format!("{}/{}/{}", self.uploads_dir, photo.category, photo.filename);
        if let Err(e) = fs::remove_file(&path).await {
            tracing::warn!("Could not remove photo file {}: {}", path, e);
        }

        Ok(())
    }

    async fn count_orphaned(&self) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) {}", ORPHAN_FILTER);
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Remove photo rows (and their files) that no student references anymore,
    /// either because the student is gone or the photo was superseded.
    pub async fn cleanup_orphaned(&self) -> Result<CleanupResponse> {
        let sql = format!(
            "SELECT p.filename, p.category, p.student_id, p.mime_type, p.size_bytes, p.created_at {}",
            ORPHAN_FILTER
        );
        let orphans = sqlx::query_as::<_, Photo>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let mut removed = 0;
        for photo in orphans {
            sqlx::query("DELETE FROM photos WHERE filename = $1")
                .bind(&photo.filename)
                .execute(&self.pool)
                .await?;
            let path = format!("{}/{}/{}", self.uploads_dir, photo.category, photo.filename);
            if let Err(e) = fs::remove_file(&path).await {
                tracing::warn!("Could not remove orphaned file {}: {}", path, e);
            }
            removed += 1;
        }

        tracing::info!(removed, "orphaned photo cleanup finished");

        Ok(CleanupResponse { removed })
    }
}

// A photo is orphaned when its student row is gone, or the student no longer
// references the file from any of the three photo columns.
const ORPHAN_FILTER: &str = r#"
    FROM photos p
    LEFT JOIN students s ON s.id = p.student_id
    WHERE s.id IS NULL
       OR ('/uploads/' || p.category || '/' || p.filename) NOT IN (
              COALESCE(s.photo_url, ''),
              COALESCE(s.family_photo_url, ''),
              COALESCE(s.passport_photo_url, '')
          )
"#;


#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    fn data_url(mime: &str, bytes: &[u8]) -> String {
        format!(
            "data:{};base64,{}",
            mime,
            base64::engine::general_purpose::STANDARD.encode(bytes)
        )
    }

    #[test]
    fn accepts_a_valid_png() {
        let bytes = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];
        let parsed = parse_data_url(&data_url("image/png", &bytes), "image/png").unwrap();
        assert_eq!(parsed.mime_type, "image/png");
        assert_eq!(parsed.extension, "png");
        assert_eq!(parsed.bytes, bytes);
    }

    #[test]
    fn rejects_disallowed_mime_type() {
        let err = parse_data_url(&data_url("image/tiff", b"II*\x00"), "image/tiff").unwrap_err();
        assert!(err.to_string().contains("not allowed"));
    }

    #[test]
    fn rejects_mime_mismatch_between_declaration_and_payload() {
        let bytes = [0xFF, 0xD8, 0xFF, 0xE0];
        let err = parse_data_url(&data_url("image/jpeg", &bytes), "image/png").unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn rejects_content_that_fails_the_magic_check() {
        let err =
            parse_data_url(&data_url("image/png", b"not a png at all"), "image/png").unwrap_err();
        assert!(err.to_string().contains("does not look like"));
    }

    #[test]
    fn rejects_payloads_over_the_size_ceiling() {
        let mut bytes = vec![0xFF, 0xD8];
        bytes.resize(MAX_PHOTO_BYTES + 1, 0);
        let err = parse_data_url(&data_url("image/jpeg", &bytes), "image/jpeg").unwrap_err();
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn whitespace_around_the_payload_is_neither_decoded_nor_counted() {
        let bytes = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];
        let padded = format!("{}\n  ", data_url("image/png", &bytes));
        let parsed = parse_data_url(&padded, "image/png").unwrap();
        assert_eq!(parsed.bytes, bytes);
    }

    #[test]
    fn rejects_non_data_urls() {
        assert!(parse_data_url("https://example.com/a.png", "image/png").is_err());
        assert!(parse_data_url("data:image/png,plainpayload", "image/png").is_err());
    }
}
