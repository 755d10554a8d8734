/// Axis-aligned bounding box in corner form, any coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BBox {
    /// Build from YOLO center-size form.
    pub fn from_cxcywh(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x1: cx - w / 2.0,
            y1: cy - h / 2.0,
            x2: cx + w / 2.0,
            y2: cy + h / 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Intersection over union. Degenerate boxes never suppress anything:
    /// a union of zero (or less) yields an IoU of zero.
    pub fn iou(&self, other: &Self) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);

        let intersection = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }

    /// Grow the box by `margin` times its own width/height on every side.
    pub fn expand(&self, margin: f32) -> Self {
        let dx = self.width() * margin;
        let dy = self.height() * margin;
        Self {
            x1: self.x1 - dx,
            y1: self.y1 - dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
        }
    }

    /// Clamp the box to `[0, width] x [0, height]`.
    pub fn clip(&self, width: u32, height: u32) -> Self {
        let w = width as f32;
        let h = height as f32;
        Self {
            x1: self.x1.clamp(0.0, w),
            y1: self.y1.clamp(0.0, h),
            x2: self.x2.clamp(0.0, w),
            y2: self.y2.clamp(0.0, h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let b = BBox::from_cxcywh(50.0, 50.0, 20.0, 20.0);
        assert!((b.iou(&b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = BBox { x1: 0.0, y1: 0.0, x2: 10.0, y2: 10.0 };
        let b = BBox { x1: 20.0, y1: 20.0, x2: 30.0, y2: 30.0 };
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn iou_of_two_zero_area_boxes_is_zero() {
        let a = BBox { x1: 5.0, y1: 5.0, x2: 5.0, y2: 5.0 };
        let b = BBox { x1: 5.0, y1: 5.0, x2: 5.0, y2: 5.0 };
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn iou_is_symmetric() {
        let a = BBox { x1: 0.0, y1: 0.0, x2: 10.0, y2: 10.0 };
        let b = BBox { x1: 5.0, y1: 5.0, x2: 15.0, y2: 15.0 };
        assert!((a.iou(&b) - b.iou(&a)).abs() < 1e-6);
    }

    #[test]
    fn half_overlap_iou() {
        let a = BBox { x1: 0.0, y1: 0.0, x2: 10.0, y2: 10.0 };
        let b = BBox { x1: 0.0, y1: 5.0, x2: 10.0, y2: 15.0 };
        // intersection 50, union 150
        assert!((a.iou(&b) - 50.0 / 150.0).abs() < 1e-6);
    }

    #[test]
    fn expand_grows_each_side_proportionally() {
        let b = BBox { x1: 10.0, y1: 20.0, x2: 30.0, y2: 60.0 };
        let e = b.expand(0.05);
        assert!((e.x1 - 9.0).abs() < 1e-5);
        assert!((e.x2 - 31.0).abs() < 1e-5);
        assert!((e.y1 - 18.0).abs() < 1e-5);
        assert!((e.y2 - 62.0).abs() < 1e-5);
    }

    #[test]
    fn clip_keeps_box_inside_image() {
        let b = BBox { x1: -5.0, y1: -5.0, x2: 120.0, y2: 90.0 };
        let c = b.clip(100, 80);
        assert_eq!(c, BBox { x1: 0.0, y1: 0.0, x2: 100.0, y2: 80.0 });
    }
}
