use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub logging: LoggingSettings,
    pub storage: RawStorageSettings,
    pub model: RawModelSettings,
    pub worker: WorkerSettings,
    pub pipeline: PipelineSettings,
    pub database: DatabaseSettings,
    pub secrets: SecretSettings,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Root folder for the byte-blob store.
#[derive(Debug, Deserialize, Clone)]
pub struct RawStorageSettings {
    pub blob_root: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawModelSettings {
    /// Path to the ONNX segmentation model artifact.
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkerSettings {
    /// Milliseconds to sleep when no pending job is found.
    pub poll_interval_ms: u64,
}

/// Post-processing thresholds. These are empirical tuning constants, kept
/// configurable rather than baked into the pipeline.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PipelineSettings {
    pub conf_threshold: f32,
    pub iou_threshold: f32,
    pub mask_threshold: f32,
    pub bbox_margin: f32,
    pub min_ring_area_ratio: f64,
    pub simplify_tolerance: f64,
}

/// Database connection pool configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: u64,
    pub idle_timeout: u64,
    pub acquire_timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecretSettings {
    pub database_url: String,
}
