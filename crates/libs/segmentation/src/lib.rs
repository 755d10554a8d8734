#![allow(clippy::missing_errors_doc)]

//! Instance-segmentation post-processing for garment detection.
//!
//! Turns raw YOLO-seg model output (per-anchor rows plus prototype masks)
//! into per-garment detections with simplified polygon outlines in original
//! image coordinates.

mod boxes;
mod classes;
mod decode;
mod letterbox;
mod mask;
mod model;
mod nms;
mod params;
mod pipeline;
mod polygon;

pub use boxes::BBox;
pub use classes::{class_name, CLASS_NAMES};
pub use decode::{decode_detections, RawDetection, MASK_COEFF_COUNT};
pub use letterbox::{letterbox, Letterbox};
pub use mask::{clean_mask, decode_mask, project_mask};
pub use model::{
    image_to_tensor, ModelError, OnnxModel, RawModelOutput, SegmentationModel,
    DEFAULT_INPUT_SIZE,
};
pub use nms::non_max_suppression;
pub use params::SegmentationParams;
pub use pipeline::{GarmentDetection, GarmentSegmenter};
pub use polygon::{extract_polygon, ring_area, PolygonPoint, Ring};
