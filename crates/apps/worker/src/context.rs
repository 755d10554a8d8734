use app_state::{AppSettings, PipelineSettings};
use color_eyre::Result;
use common_services::storage::{BlobStore, FsBlobStore};
use segmentation::{GarmentSegmenter, OnnxModel, SegmentationModel, SegmentationParams};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct WorkerContext {
    pub worker_id: String,
    pub pool: PgPool,
    pub settings: AppSettings,
    pub blob_store: Arc<dyn BlobStore>,
    /// Trait object so loop tests can swap in a stub model. The ONNX session
    /// is not re-entrant, one job infers at a time.
    pub model: Arc<Mutex<dyn SegmentationModel + Send>>,
    pub segmenter: GarmentSegmenter,
}

impl WorkerContext {
    /// Creates a new instance of `WorkerContext`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the model artifact cannot be loaded.
    pub fn new(pool: PgPool, settings: AppSettings, worker_id: String) -> Result<Self> {
        let model = Arc::new(Mutex::new(OnnxModel::load(&settings.model.path)?));
        Ok(Self::with_model(pool, settings, worker_id, model))
    }

    pub fn with_model(
        pool: PgPool,
        settings: AppSettings,
        worker_id: String,
        model: Arc<Mutex<dyn SegmentationModel + Send>>,
    ) -> Self {
        let blob_store = Arc::new(FsBlobStore::new(settings.storage.blob_root.clone()));
        let segmenter = GarmentSegmenter::new(to_params(&settings.pipeline));

        Self {
            worker_id,
            pool,
            blob_store,
            model,
            segmenter,
            settings,
        }
    }
}

fn to_params(pipeline: &PipelineSettings) -> SegmentationParams {
    SegmentationParams {
        conf_threshold: pipeline.conf_threshold,
        iou_threshold: pipeline.iou_threshold,
        mask_threshold: pipeline.mask_threshold,
        bbox_margin: pipeline.bbox_margin,
        min_ring_area_ratio: pipeline.min_ring_area_ratio,
        simplify_tolerance: pipeline.simplify_tolerance,
    }
}
