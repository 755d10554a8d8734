use std::path::{Path, PathBuf};

use image::RgbImage;
use ndarray::{Array2, Array3, Array4, ArrayView4};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use thiserror::Error;
use tracing::info;

/// YOLOv8-seg models are exported with a 640 square input.
pub const DEFAULT_INPUT_SIZE: u32 = 640;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model artifact not found at {0}")]
    ArtifactMissing(PathBuf),
    #[error("Inference engine error: {0}")]
    Engine(#[from] ort::Error),
    #[error("Unexpected model output shape: {0}")]
    OutputShape(String),
}

/// Raw tensors from one forward pass, before any post-processing.
#[derive(Debug, Clone)]
pub struct RawModelOutput {
    /// Prediction head, `[4 + C + K, N]` over anchors.
    pub predictions: Array2<f32>,
    /// Mask prototype stack, `[K, Hp, Wp]`.
    pub prototypes: Array3<f32>,
}

/// Anything that can run the segmentation forward pass. The post-processing
/// pipeline only talks to this trait, so tests can feed it canned tensors.
pub trait SegmentationModel {
    fn input_size(&self) -> u32;
    fn infer(&mut self, input: ArrayView4<'_, f32>) -> Result<RawModelOutput, ModelError>;
}

/// ONNX Runtime backed model.
#[derive(Debug)]
pub struct OnnxModel {
    session: Session,
    input_size: u32,
}

impl OnnxModel {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.is_file() {
            return Err(ModelError::ArtifactMissing(path.to_path_buf()));
        }
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(path)?;
        info!("🧠 Loaded segmentation model from {}", path.display());
        Ok(Self {
            session,
            input_size: DEFAULT_INPUT_SIZE,
        })
    }
}

impl SegmentationModel for OnnxModel {
    fn input_size(&self) -> u32 {
        self.input_size
    }

    fn infer(&mut self, input: ArrayView4<'_, f32>) -> Result<RawModelOutput, ModelError> {
        let value = Value::from_array(input.to_owned())?;
        let outputs = self.session.run(ort::inputs![value])?;

        let (pred_shape, pred_data) = outputs[0].try_extract_tensor::<f32>()?;
        let pred_dims = dims3(pred_shape, "predictions")?;
        let predictions =
            Array2::from_shape_vec((pred_dims[1], pred_dims[2]), pred_data.to_vec())
                .map_err(|e| ModelError::OutputShape(e.to_string()))?;

        let (proto_shape, proto_data) = outputs[1].try_extract_tensor::<f32>()?;
        let proto_dims = dims4(proto_shape, "prototypes")?;
        let prototypes = Array3::from_shape_vec(
            (proto_dims[1], proto_dims[2], proto_dims[3]),
            proto_data.to_vec(),
        )
        .map_err(|e| ModelError::OutputShape(e.to_string()))?;

        Ok(RawModelOutput {
            predictions,
            prototypes,
        })
    }
}

fn dims3(shape: &[i64], name: &str) -> Result<[usize; 3], ModelError> {
    match shape {
        [a, b, c] => Ok([*a as usize, *b as usize, *c as usize]),
        other => Err(ModelError::OutputShape(format!(
            "{name} tensor has shape {other:?}, expected 3 dimensions"
        ))),
    }
}

fn dims4(shape: &[i64], name: &str) -> Result<[usize; 4], ModelError> {
    match shape {
        [a, b, c, d] => Ok([*a as usize, *b as usize, *c as usize, *d as usize]),
        other => Err(ModelError::OutputShape(format!(
            "{name} tensor has shape {other:?}, expected 4 dimensions"
        ))),
    }
}

/// Convert an RGB image to a normalized NCHW float tensor.
pub fn image_to_tensor(image: &RgbImage) -> Array4<f32> {
    let (width, height) = image.dimensions();
    let mut tensor = Array4::<f32>::zeros((1, 3, height as usize, width as usize));
    for (x, y, pixel) in image.enumerate_pixels() {
        for channel in 0..3 {
            tensor[[0, channel, y as usize, x as usize]] =
                f32::from(pixel[channel]) / 255.0;
        }
    }
    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn tensor_is_nchw_and_normalized() {
        let mut img = RgbImage::new(4, 2);
        img.put_pixel(3, 1, Rgb([255, 128, 0]));
        let tensor = image_to_tensor(&img);
        assert_eq!(tensor.dim(), (1, 3, 2, 4));
        assert_eq!(tensor[[0, 0, 1, 3]], 1.0);
        assert!((tensor[[0, 1, 1, 3]] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(tensor[[0, 2, 1, 3]], 0.0);
    }

    #[test]
    fn missing_artifact_is_reported_with_its_path() {
        let err = OnnxModel::load(Path::new("/nonexistent/model.onnx")).unwrap_err();
        assert!(matches!(err, ModelError::ArtifactMissing(_)));
        assert!(err.to_string().contains("/nonexistent/model.onnx"));
    }
}
