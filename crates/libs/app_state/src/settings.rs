use crate::{
    DatabaseSettings, LoggingSettings, PipelineSettings, RawSettings, SecretSettings,
    WorkerSettings,
};
use serde::Deserialize;
use std::path::{absolute, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub logging: LoggingSettings,
    pub storage: StorageSettings,
    pub model: ModelSettings,
    pub worker: WorkerSettings,
    pub pipeline: PipelineSettings,
    pub database: DatabaseSettings,
    pub secrets: SecretSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub blob_root: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelSettings {
    pub path: PathBuf,
}

impl From<RawSettings> for AppSettings {
    fn from(raw: RawSettings) -> Self {
        let blob_root = absolute(&raw.storage.blob_root).expect("Invalid blob_root");
        let model_path = absolute(&raw.model.path).expect("Invalid model path");

        Self {
            logging: raw.logging,
            storage: StorageSettings { blob_root },
            model: ModelSettings { path: model_path },
            worker: raw.worker,
            pipeline: raw.pipeline,
            database: raw.database,
            secrets: raw.secrets,
        }
    }
}
