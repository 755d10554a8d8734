use crate::context::WorkerContext;
use color_eyre::eyre::Result;
use common_services::database::detections::{insert_detection, insert_embedding, insert_polygon};
use common_services::database::jobs::ClaimedJob;
use tracing::info;

// TODO: swap the zero vector for a real garment embedding model once one is
// exported alongside the segmentation model.
const EMBEDDING_DIM: usize = 128;
const EMBEDDING_MODEL_NAME: &str = "placeholder";

/// Runs segmentation for a claimed job and persists every detection, its
/// outline and a placeholder embedding in a single transaction.
///
/// # Errors
///
/// This function will return an error if the blob cannot be read, the image
/// cannot be decoded, inference fails, or a database operation fails.
pub async fn handle_job(context: &WorkerContext, job: &ClaimedJob) -> Result<usize> {
    let bytes = context.blob_store.get(&job.storage_key)?;
    let image = image::load_from_memory(&bytes)?.to_rgb8();

    let garments = {
        let mut model = context.model.lock().await;
        context.segmenter.segment(&mut *model, &image)?
    };

    let mut tx = context.pool.begin().await?;
    for garment in &garments {
        let detection_id = insert_detection(
            &mut tx,
            job.image_id,
            &garment.label,
            f64::from(garment.confidence),
            (garment.bbox_x, garment.bbox_y, garment.bbox_w, garment.bbox_h),
        )
        .await?;

        if !garment.polygon.is_empty() {
            let points_json = serde_json::to_string(&garment.polygon)?;
            insert_polygon(&mut tx, detection_id, &points_json, true).await?;
        }

        let vector = serde_json::to_string(&vec![0.0f32; EMBEDDING_DIM])?;
        insert_embedding(&mut tx, detection_id, EMBEDDING_MODEL_NAME, &vector).await?;
    }
    tx.commit().await?;

    info!(
        "Persisted {} detections for image {}",
        garments.len(),
        job.image_id
    );
    Ok(garments.len())
}
