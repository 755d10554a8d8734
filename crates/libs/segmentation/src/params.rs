use serde::{Deserialize, Serialize};

/// Tunable post-processing parameters.
///
/// The mask threshold and ring-area ratio are empirical tuning constants;
/// they are configuration, not fixed behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SegmentationParams {
    /// Detections with confidence at or below this are discarded.
    pub conf_threshold: f32,
    /// Boxes overlapping a kept box by more than this IoU are suppressed.
    pub iou_threshold: f32,
    /// Probability level at which the instance mask is binarized. Deliberately
    /// high: precision over recall at the garment edge.
    pub mask_threshold: f32,
    /// Fraction of box width/height added on each side before mask gating.
    pub bbox_margin: f32,
    /// Rings smaller than this fraction of the largest ring's area are dropped.
    pub min_ring_area_ratio: f64,
    /// Douglas-Peucker tolerance as a fraction of ring perimeter.
    pub simplify_tolerance: f64,
}

impl Default for SegmentationParams {
    fn default() -> Self {
        Self {
            conf_threshold: 0.25,
            iou_threshold: 0.45,
            mask_threshold: 0.75,
            bbox_margin: 0.05,
            min_ring_area_ratio: 0.20,
            simplify_tolerance: 0.001,
        }
    }
}
