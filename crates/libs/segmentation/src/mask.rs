use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{dilate, erode};
use imageproc::distance_transform::Norm;
use ndarray::{Array2, ArrayView3};

use crate::{BBox, Letterbox};

/// Full-resolution probability mask, one f32 per pixel.
pub type FloatMask = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Combine mask coefficients with the prototype stack `[K, Hp, Wp]` into a
/// prototype-resolution probability mask.
pub fn decode_mask(coeffs: &[f32], prototypes: ArrayView3<'_, f32>) -> Array2<f32> {
    let (k, hp, wp) = prototypes.dim();
    let k = k.min(coeffs.len());

    let mut mask = Array2::<f32>::zeros((hp, wp));
    for y in 0..hp {
        for x in 0..wp {
            let mut logit = 0.0f32;
            for c in 0..k {
                logit += coeffs[c] * prototypes[[c, y, x]];
            }
            mask[[y, x]] = sigmoid(logit);
        }
    }
    mask
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Project a prototype-resolution mask back into original image space:
/// upsample to the model square, strip the letterbox padding, then resize to
/// the original dimensions.
pub fn project_mask(
    mask: &Array2<f32>,
    transform: &Letterbox,
    width: u32,
    height: u32,
) -> FloatMask {
    let (hp, wp) = mask.dim();
    let mut proto = FloatMask::new(wp as u32, hp as u32);
    for ((y, x), v) in mask.indexed_iter() {
        proto.put_pixel(x as u32, y as u32, Luma([*v]));
    }

    let size = transform.target_size;
    let square = imageops::resize(&proto, size, size, FilterType::Triangle);

    // truncate the pad like the projection did, a sub-pixel sliver of grey
    // border is acceptable
    let pad_x = transform.pad_x as u32;
    let pad_y = transform.pad_y as u32;
    let content_w = size.saturating_sub(2 * pad_x).max(1);
    let content_h = size.saturating_sub(2 * pad_y).max(1);
    let content = imageops::crop_imm(&square, pad_x, pad_y, content_w, content_h).to_image();

    imageops::resize(&content, width, height, FilterType::Triangle)
}

/// Binarize a probability mask, zeroing everything outside the gating box.
pub(crate) fn binarize_gated(mask: &FloatMask, threshold: f32, gate: &BBox) -> GrayImage {
    let mut out = GrayImage::new(mask.width(), mask.height());
    for (x, y, pixel) in mask.enumerate_pixels() {
        let inside = (x as f32) >= gate.x1
            && (x as f32) <= gate.x2
            && (y as f32) >= gate.y1
            && (y as f32) <= gate.y2;
        if inside && pixel[0] > threshold {
            out.put_pixel(x, y, Luma([255]));
        }
    }
    out
}

/// Smooth a binary mask before contour tracing.
///
/// Morphological opening removes speckle, closing fills pinholes, and a light
/// Gaussian blur plus rethreshold rounds off the staircase edges left by the
/// prototype upsampling. The structuring element scales with image size.
pub fn clean_mask(mask: &GrayImage) -> GrayImage {
    let min_dim = mask.width().min(mask.height());
    let kernel = elliptical_kernel_size(min_dim);
    let radius = ((kernel - 1) / 2).min(255) as u8;

    let mut cleaned = mask.clone();
    // open, two iterations
    for _ in 0..2 {
        cleaned = erode(&cleaned, Norm::L2, radius);
    }
    for _ in 0..2 {
        cleaned = dilate(&cleaned, Norm::L2, radius);
    }
    // close, two iterations
    for _ in 0..2 {
        cleaned = dilate(&cleaned, Norm::L2, radius);
    }
    for _ in 0..2 {
        cleaned = erode(&cleaned, Norm::L2, radius);
    }

    let blur_kernel = kernel - 2;
    let sigma = gaussian_sigma(blur_kernel);
    let blurred = gaussian_blur_f32(&cleaned, sigma);

    let mut out = GrayImage::new(mask.width(), mask.height());
    for (x, y, pixel) in blurred.enumerate_pixels() {
        if pixel[0] > 127 {
            out.put_pixel(x, y, Luma([255]));
        }
    }
    out
}

/// Odd structuring element size, at least 5, roughly 1% of the short side.
fn elliptical_kernel_size(min_dim: u32) -> u32 {
    let mut kernel = (f64::from(min_dim) * 0.01).round() as u32;
    kernel = kernel.max(5);
    if kernel % 2 == 0 {
        kernel += 1;
    }
    kernel
}

/// Sigma a `ksize`-wide Gaussian would get when derived from kernel size
/// alone, matching the common auto-sigma rule.
fn gaussian_sigma(ksize: u32) -> f32 {
    (0.3 * ((f64::from(ksize) - 1.0) * 0.5 - 1.0) + 0.8) as f32
}
