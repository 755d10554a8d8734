use color_eyre::Result;
use sqlx::PgTransaction;
use uuid::Uuid;

/// Inserts one detection row inside the caller's transaction, so every
/// detection for an image lands atomically with its polygon and embedding.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn insert_detection(
    tx: &mut PgTransaction<'_>,
    image_id: Uuid,
    label: &str,
    confidence: f64,
    bbox: (i32, i32, i32, i32),
) -> Result<Uuid> {
    let detection_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO detections (id, image_id, label, confidence, bbox_x, bbox_y, bbox_w, bbox_h)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(detection_id)
    .bind(image_id)
    .bind(label)
    .bind(confidence)
    .bind(bbox.0)
    .bind(bbox.1)
    .bind(bbox.2)
    .bind(bbox.3)
    .execute(&mut **tx)
    .await?;
    Ok(detection_id)
}

/// Stores the serialized outline rings for a detection.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn insert_polygon(
    tx: &mut PgTransaction<'_>,
    detection_id: Uuid,
    points_json: &str,
    simplified: bool,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO polygons (id, detection_id, points_json, simplified)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::new_v4())
    .bind(detection_id)
    .bind(points_json)
    .bind(simplified)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Stores a feature vector for a detection.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn insert_embedding(
    tx: &mut PgTransaction<'_>,
    detection_id: Uuid,
    model_name: &str,
    vector: &str,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO embeddings (id, detection_id, model_name, vector)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::new_v4())
    .bind(detection_id)
    .bind(model_name)
    .bind(vector)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
