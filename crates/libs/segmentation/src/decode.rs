use ndarray::ArrayView2;

use crate::BBox;

/// Number of mask coefficients per anchor in the YOLOv8-seg head.
pub const MASK_COEFF_COUNT: usize = 32;

/// One anchor that survived the confidence gate, still in model-input
/// coordinates.
#[derive(Debug, Clone)]
pub struct RawDetection {
    pub bbox: BBox,
    pub class_id: usize,
    pub confidence: f32,
    pub mask_coeffs: Vec<f32>,
}

/// Decode the prediction tensor `[4 + C + K, N]` into candidate detections.
///
/// Each anchor column holds `cx, cy, w, h`, then `C` class scores, then `K`
/// mask coefficients. An anchor is kept when its best class score is strictly
/// above `conf_threshold`.
pub fn decode_detections(
    predictions: ArrayView2<'_, f32>,
    conf_threshold: f32,
) -> Vec<RawDetection> {
    let rows = predictions.nrows();
    let anchors = predictions.ncols();
    let class_count = rows.saturating_sub(4 + MASK_COEFF_COUNT);
    if class_count == 0 {
        return Vec::new();
    }

    let mut detections = Vec::new();
    for anchor in 0..anchors {
        let mut best_class = 0;
        let mut best_score = f32::MIN;
        for class in 0..class_count {
            let score = predictions[[4 + class, anchor]];
            if score > best_score {
                best_score = score;
                best_class = class;
            }
        }
        if best_score <= conf_threshold {
            continue;
        }

        let cx = predictions[[0, anchor]];
        let cy = predictions[[1, anchor]];
        let w = predictions[[2, anchor]];
        let h = predictions[[3, anchor]];

        let coeff_base = 4 + class_count;
        let mask_coeffs = (0..MASK_COEFF_COUNT)
            .map(|k| predictions[[coeff_base + k, anchor]])
            .collect();

        detections.push(RawDetection {
            bbox: BBox::from_cxcywh(cx, cy, w, h),
            class_id: best_class,
            confidence: best_score,
            mask_coeffs,
        });
    }
    detections
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    const CLASS_COUNT: usize = 13;

    fn empty_predictions(anchors: usize) -> Array2<f32> {
        Array2::zeros((4 + CLASS_COUNT + MASK_COEFF_COUNT, anchors))
    }

    fn set_anchor(
        preds: &mut Array2<f32>,
        anchor: usize,
        bbox: [f32; 4],
        class_id: usize,
        score: f32,
    ) {
        for (i, v) in bbox.iter().enumerate() {
            preds[[i, anchor]] = *v;
        }
        preds[[4 + class_id, anchor]] = score;
    }

    #[test]
    fn anchors_at_or_below_threshold_are_dropped() {
        let mut preds = empty_predictions(3);
        set_anchor(&mut preds, 0, [10.0, 10.0, 4.0, 4.0], 2, 0.25);
        set_anchor(&mut preds, 1, [20.0, 20.0, 4.0, 4.0], 2, 0.2499);
        set_anchor(&mut preds, 2, [30.0, 30.0, 4.0, 4.0], 2, 0.26);

        let out = decode_detections(preds.view(), 0.25);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].confidence, 0.26);
    }

    #[test]
    fn best_class_wins_the_argmax() {
        let mut preds = empty_predictions(1);
        set_anchor(&mut preds, 0, [50.0, 50.0, 10.0, 10.0], 3, 0.4);
        preds[[4 + 7, 0]] = 0.9;

        let out = decode_detections(preds.view(), 0.25);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].class_id, 7);
        assert_eq!(out[0].confidence, 0.9);
    }

    #[test]
    fn center_size_converts_to_corners() {
        let mut preds = empty_predictions(1);
        set_anchor(&mut preds, 0, [100.0, 60.0, 20.0, 10.0], 0, 0.8);

        let out = decode_detections(preds.view(), 0.25);
        let b = out[0].bbox;
        assert_eq!((b.x1, b.y1, b.x2, b.y2), (90.0, 55.0, 110.0, 65.0));
    }

    #[test]
    fn mask_coefficients_are_carried_through() {
        let mut preds = empty_predictions(1);
        set_anchor(&mut preds, 0, [10.0, 10.0, 5.0, 5.0], 1, 0.5);
        for k in 0..MASK_COEFF_COUNT {
            preds[[4 + CLASS_COUNT + k, 0]] = k as f32;
        }

        let out = decode_detections(preds.view(), 0.25);
        assert_eq!(out[0].mask_coeffs.len(), MASK_COEFF_COUNT);
        assert_eq!(out[0].mask_coeffs[31], 31.0);
    }

    #[test]
    fn malformed_tensor_without_class_rows_yields_nothing() {
        let preds = Array2::<f32>::zeros((4 + MASK_COEFF_COUNT, 10));
        assert!(decode_detections(preds.view(), 0.25).is_empty());
    }
}
