use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    class_name, clean_mask, decode_detections, decode_mask, extract_polygon, letterbox,
    mask::binarize_gated, non_max_suppression, project_mask, Letterbox, ModelError,
    RawModelOutput, Ring, SegmentationModel, SegmentationParams,
};

/// One detected garment in original image coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarmentDetection {
    pub class_id: usize,
    pub label: String,
    pub confidence: f32,
    pub bbox_x: i32,
    pub bbox_y: i32,
    pub bbox_w: i32,
    pub bbox_h: i32,
    /// Simplified outline rings. May be empty when the mask dissolves during
    /// cleanup.
    pub polygon: Vec<Ring>,
}

/// The full post-processing pipeline, model output in, garments out.
pub struct GarmentSegmenter {
    params: SegmentationParams,
}

impl GarmentSegmenter {
    pub fn new(params: SegmentationParams) -> Self {
        Self { params }
    }

    /// Run the model on an image and post-process the result.
    pub fn segment(
        &self,
        model: &mut dyn SegmentationModel,
        image: &RgbImage,
    ) -> Result<Vec<GarmentDetection>, ModelError> {
        let (square, transform) = letterbox(image, model.input_size());
        let tensor = crate::image_to_tensor(&square);
        let raw = model.infer(tensor.view())?;
        Ok(self.process(&raw, &transform, image.width(), image.height()))
    }

    /// Post-process raw model tensors for an image of `width` x `height`.
    pub fn process(
        &self,
        raw: &RawModelOutput,
        transform: &Letterbox,
        width: u32,
        height: u32,
    ) -> Vec<GarmentDetection> {
        let candidates = decode_detections(raw.predictions.view(), self.params.conf_threshold);
        let kept = non_max_suppression(candidates, self.params.iou_threshold);
        debug!("{} candidate boxes survived suppression", kept.len());

        kept.into_iter()
            .map(|detection| {
                let bbox = transform.unproject_box(&detection.bbox, width, height);
                let gate = bbox.expand(self.params.bbox_margin).clip(width, height);

                let proto_mask = decode_mask(&detection.mask_coeffs, raw.prototypes.view());
                let full_mask = project_mask(&proto_mask, transform, width, height);
                let binary = binarize_gated(&full_mask, self.params.mask_threshold, &gate);
                let cleaned = clean_mask(&binary);
                let polygon = extract_polygon(
                    &cleaned,
                    self.params.min_ring_area_ratio,
                    self.params.simplify_tolerance,
                );

                GarmentDetection {
                    class_id: detection.class_id,
                    label: class_name(detection.class_id).to_string(),
                    confidence: detection.confidence,
                    bbox_x: bbox.x1.round() as i32,
                    bbox_y: bbox.y1.round() as i32,
                    bbox_w: bbox.width().round() as i32,
                    bbox_h: bbox.height().round() as i32,
                    polygon,
                }
            })
            .collect()
    }
}
