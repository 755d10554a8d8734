use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, FromRow, Serialize)]
pub struct ImageRecord {
    pub id: Uuid,
    pub storage_key: String,
    pub width: i32,
    pub height: i32,
    pub file_size: i64,
    pub hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Registers an uploaded image by its blob storage key.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn insert_image(
    pool: &PgPool,
    storage_key: &str,
    width: i32,
    height: i32,
    file_size: i64,
    hash: Option<&str>,
) -> Result<Uuid> {
    let image_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO images (id, storage_key, width, height, file_size, hash)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(image_id)
    .bind(storage_key)
    .bind(width)
    .bind(height)
    .bind(file_size)
    .bind(hash)
    .execute(pool)
    .await?;
    Ok(image_id)
}

/// Fetch one image record by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn get_image(pool: &PgPool, image_id: Uuid) -> Result<Option<ImageRecord>> {
    let image = sqlx::query_as::<_, ImageRecord>(
        "SELECT id, storage_key, width, height, file_size, hash, created_at
         FROM images WHERE id = $1",
    )
    .bind(image_id)
    .fetch_optional(pool)
    .await?;
    Ok(image)
}
