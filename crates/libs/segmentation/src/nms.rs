use crate::RawDetection;

/// Greedy non-maximum suppression across all classes.
///
/// Candidates are visited in descending confidence, ties resolved by original
/// order. A candidate is discarded when it overlaps an already kept box by
/// strictly more than `iou_threshold`. Kept detections come back in
/// descending confidence order.
pub fn non_max_suppression(
    mut detections: Vec<RawDetection>,
    iou_threshold: f32,
) -> Vec<RawDetection> {
    // stable sort keeps input order for equal confidences
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept: Vec<RawDetection> = Vec::with_capacity(detections.len());
    for candidate in detections {
        let suppressed = kept
            .iter()
            .any(|k| k.bbox.iou(&candidate.bbox) > iou_threshold);
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BBox;

    fn det(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32) -> RawDetection {
        RawDetection {
            bbox: BBox { x1, y1, x2, y2 },
            class_id: 0,
            confidence,
            mask_coeffs: Vec::new(),
        }
    }

    #[test]
    fn highly_overlapping_pair_keeps_the_stronger() {
        // IoU of these two is 9/11, well above 0.45
        let input = vec![det(0.0, 0.0, 10.0, 10.0, 0.6), det(1.0, 0.0, 11.0, 10.0, 0.9)];
        let out = non_max_suppression(input, 0.45);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].confidence, 0.9);
    }

    #[test]
    fn disjoint_boxes_all_survive() {
        let input = vec![
            det(0.0, 0.0, 10.0, 10.0, 0.5),
            det(50.0, 50.0, 60.0, 60.0, 0.7),
            det(100.0, 0.0, 110.0, 10.0, 0.3),
        ];
        let out = non_max_suppression(input, 0.45);
        assert_eq!(out.len(), 3);
        // descending confidence order
        assert_eq!(out[0].confidence, 0.7);
        assert_eq!(out[2].confidence, 0.3);
    }

    #[test]
    fn overlap_exactly_at_threshold_is_kept() {
        // IoU = 1/3 for these, run with threshold 1/3: strict comparison keeps both
        let a = det(0.0, 0.0, 10.0, 10.0, 0.9);
        let b = det(0.0, 5.0, 10.0, 15.0, 0.8);
        let iou = a.bbox.iou(&b.bbox);
        let out = non_max_suppression(vec![a, b], iou);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn equal_confidence_ties_keep_input_order() {
        let first = det(0.0, 0.0, 10.0, 10.0, 0.8);
        let second = det(0.5, 0.0, 10.5, 10.0, 0.8);
        let out = non_max_suppression(vec![first, second], 0.45);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].bbox.x1, 0.0);
    }

    #[test]
    fn zero_area_boxes_never_suppress_each_other() {
        let input = vec![det(5.0, 5.0, 5.0, 5.0, 0.9), det(5.0, 5.0, 5.0, 5.0, 0.8)];
        let out = non_max_suppression(input, 0.45);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(non_max_suppression(Vec::new(), 0.45).is_empty());
    }
}
