pub mod detections;
pub mod images;
pub mod jobs;
