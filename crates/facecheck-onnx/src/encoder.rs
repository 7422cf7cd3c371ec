//! Face encoder via ONNX Runtime.
//!
//! Turns an aligned square RGB chip into an embedding whose Euclidean distances
//! follow the usual convention of the 128-d face encoders (same person below
//! roughly 0.6).

use crate::alignment;
use crate::detector::Detection;
use facecheck_core::Embedding;
use image::RgbImage;
use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;
use thiserror::Error;

const ENCODER_MEAN: f32 = 127.5;
const ENCODER_STD: f32 = 127.5;

#[derive(Error, Debug)]
pub enum EncoderError {
    #[error("encoder model not found: {0}")]
    ModelNotFound(String),
    #[error("encoder inference failed: {0}")]
    InferenceFailed(String),
    #[error("face has no landmarks; the detector must provide them for alignment")]
    NoLandmarks,
    #[error("ort: {0}")]
    Ort(#[from] ort::Error),
}

pub struct FaceEncoder {
    session: Session,
    input_size: u32,
    normalize: bool,
}

impl FaceEncoder {
    pub fn load(
        model_path: &Path,
        input_size: u32,
        normalize: bool,
        intra_threads: usize,
    ) -> Result<Self, EncoderError> {
        if !model_path.exists() {
            return Err(EncoderError::ModelNotFound(model_path.display().to_string()));
        }

        let session = Session::builder()?
            .with_intra_threads(intra_threads)?
            .commit_from_file(model_path)?;

        tracing::info!(
            path = %model_path.display(),
            input_size,
            normalize,
            outputs = ?session.outputs().iter().map(|o| o.name()).collect::<Vec<_>>(),
            "loaded face encoder model"
        );

        Ok(Self {
            session,
            input_size,
            normalize,
        })
    }

    /// Align the detected face and encode it.
    pub fn encode(&mut self, img: &RgbImage, face: &Detection) -> Result<Embedding, EncoderError> {
        let landmarks = face.landmarks.as_ref().ok_or(EncoderError::NoLandmarks)?;
        let chip = alignment::align_face(img, landmarks, self.input_size);
        let input = to_tensor(&chip);

        let outputs = self.session.run(ort::inputs![TensorRef::from_array_view(input.view())?])?;
        let (_, raw) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| EncoderError::InferenceFailed(format!("embedding output: {e}")))?;

        if raw.is_empty() {
            return Err(EncoderError::InferenceFailed("empty embedding".into()));
        }

        let values = if self.normalize {
            l2_normalize(raw)
        } else {
            raw.to_vec()
        };
        Ok(Embedding::new(values))
    }
}

/// RGB chip → normalised NCHW tensor.
fn to_tensor(chip: &RgbImage) -> Array4<f32> {
    let (w, h) = chip.dimensions();
    let mut tensor = Array4::<f32>::zeros((1, 3, h as usize, w as usize));
    for (x, y, p) in chip.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = (p.0[c] as f32 - ENCODER_MEAN) / ENCODER_STD;
        }
    }
    tensor
}

fn l2_normalize(raw: &[f32]) -> Vec<f32> {
    let norm = raw.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        raw.iter().map(|x| x / norm).collect()
    } else {
        raw.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_tensor_shape_and_channels() {
        let mut chip = RgbImage::from_pixel(150, 150, Rgb([0, 128, 255]));
        chip.put_pixel(3, 7, Rgb([255, 255, 255]));
        let t = to_tensor(&chip);
        assert_eq!(t.shape(), &[1, 3, 150, 150]);
        assert!((t[[0, 0, 0, 0]] + 1.0).abs() < 1e-6);
        assert!((t[[0, 1, 0, 0]] - (128.0 - ENCODER_MEAN) / ENCODER_STD).abs() < 1e-6);
        assert!((t[[0, 2, 0, 0]] - 1.0).abs() < 1e-6);
        // x=3, y=7 lands at row 7, column 3
        assert!((t[[0, 0, 7, 3]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize() {
        let v = l2_normalize(&[3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        assert_eq!(l2_normalize(&[0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_missing_model() {
        let err = FaceEncoder::load(Path::new("/nonexistent/encoder.onnx"), 150, false, 1)
            .err()
            .unwrap();
        assert!(matches!(err, EncoderError::ModelNotFound(_)));
    }
}
