use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use crate::BBox;

/// Padding grey used by YOLO letterboxing.
const FILL: Rgb<u8> = Rgb([114, 114, 114]);

/// The affine transform that maps original image coordinates into the
/// square model input, recorded so detections can be projected back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f64,
    pub pad_x: f64,
    pub pad_y: f64,
    pub target_size: u32,
}

impl Letterbox {
    /// Compute the transform for an image of `width` x `height` fitted into a
    /// `target_size` square with preserved aspect ratio and symmetric padding.
    pub fn fit(width: u32, height: u32, target_size: u32) -> Self {
        let scale = f64::min(
            f64::from(target_size) / f64::from(width),
            f64::from(target_size) / f64::from(height),
        );
        let new_w = (f64::from(width) * scale).round();
        let new_h = (f64::from(height) * scale).round();
        Self {
            scale,
            pad_x: (f64::from(target_size) - new_w) / 2.0,
            pad_y: (f64::from(target_size) - new_h) / 2.0,
            target_size,
        }
    }

    /// Size of the scaled image content inside the square, before padding.
    pub fn content_size(&self, width: u32, height: u32) -> (u32, u32) {
        let new_w = (f64::from(width) * self.scale).round() as u32;
        let new_h = (f64::from(height) * self.scale).round() as u32;
        (new_w, new_h)
    }

    /// Map a box from model-input coordinates back into original image
    /// coordinates, clipped to the image bounds.
    pub fn unproject_box(&self, bbox: &BBox, width: u32, height: u32) -> BBox {
        let undo = |v: f32, pad: f64| ((f64::from(v) - pad) / self.scale) as f32;
        BBox {
            x1: undo(bbox.x1, self.pad_x),
            y1: undo(bbox.y1, self.pad_y),
            x2: undo(bbox.x2, self.pad_x),
            y2: undo(bbox.y2, self.pad_y),
        }
        .clip(width, height)
    }

    /// Map a box from original image coordinates into model-input coordinates.
    pub fn project_box(&self, bbox: &BBox) -> BBox {
        let apply = |v: f32, pad: f64| (f64::from(v) * self.scale + pad) as f32;
        BBox {
            x1: apply(bbox.x1, self.pad_x),
            y1: apply(bbox.y1, self.pad_y),
            x2: apply(bbox.x2, self.pad_x),
            y2: apply(bbox.y2, self.pad_y),
        }
    }
}

/// Resize `image` into a `target_size` square with aspect ratio preserved and
/// grey padding, returning the square and the transform that produced it.
pub fn letterbox(image: &RgbImage, target_size: u32) -> (RgbImage, Letterbox) {
    let transform = Letterbox::fit(image.width(), image.height(), target_size);
    let (new_w, new_h) = transform.content_size(image.width(), image.height());

    let resized = imageops::resize(image, new_w, new_h, FilterType::Triangle);

    let mut canvas = RgbImage::from_pixel(target_size, target_size, FILL);
    let x0 = transform.pad_x.round() as i64;
    let y0 = transform.pad_y.round() as i64;
    imageops::overlay(&mut canvas, &resized, x0, y0);

    (canvas, transform)
}
