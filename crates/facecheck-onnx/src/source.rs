use crate::config::SourceConfig;
use crate::detector::{DetectorError, FaceDetector};
use crate::encoder::{EncoderError, FaceEncoder};
use facecheck_core::{EmbeddingSource, FaceSet, SourceError};
use image::RgbImage;
use std::path::Path;

struct Models {
    detector: FaceDetector,
    encoder: FaceEncoder,
}

/// [`EmbeddingSource`] backed by SCRFD detection and an ONNX face encoder.
///
/// Models load on first use unless [`load`](Self::load) is called up front, so
/// a one-shot process that fails on a missing file never touches the runtime.
pub struct OnnxEmbeddingSource {
    config: SourceConfig,
    models: Option<Models>,
}

impl OnnxEmbeddingSource {
    pub fn new(config: SourceConfig) -> Self {
        Self { config, models: None }
    }

    /// Build and load both models now.
    pub fn load(config: SourceConfig) -> Result<Self, SourceError> {
        let mut source = Self::new(config);
        source.models()?;
        Ok(source)
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn models(&mut self) -> Result<&mut Models, SourceError> {
        if self.models.is_none() {
            let cfg = &self.config;
            let detector = FaceDetector::load(
                &cfg.detector_model,
                cfg.detection_threshold,
                cfg.intra_threads,
            )
            .map_err(detector_unavailable)?;
            let encoder = FaceEncoder::load(
                &cfg.encoder_model,
                cfg.encoder_input_size,
                cfg.normalize_embeddings,
                cfg.intra_threads,
            )
            .map_err(encoder_unavailable)?;
            self.models = Some(Models { detector, encoder });
        }
        self.models
            .as_mut()
            .ok_or_else(|| SourceError::Unavailable("models not loaded".into()))
    }
}

impl EmbeddingSource for OnnxEmbeddingSource {
    fn extract_embeddings(&mut self, image: &Path) -> Result<FaceSet, SourceError> {
        let models = self.models()?;
        let img = decode(image)?;

        let faces = models
            .detector
            .detect(&img)
            .map_err(|e| SourceError::Extraction(e.to_string()))?;
        tracing::debug!(faces = faces.len(), width = img.width(), height = img.height(), "faces detected");

        faces
            .iter()
            .map(|face| {
                models
                    .encoder
                    .encode(&img, face)
                    .map_err(|e| SourceError::Extraction(e.to_string()))
            })
            .collect()
    }

    fn is_loaded(&self) -> bool {
        self.models.is_some()
    }
}

fn decode(path: &Path) -> Result<RgbImage, SourceError> {
    let img = image::ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| SourceError::Extraction(format!("cannot read image: {}", e.kind())))?
        .decode()
        .map_err(|e| SourceError::Extraction(format!("cannot decode image: {e}")))?;
    Ok(img.to_rgb8())
}

// Load failures of either model mean the backend cannot run at all. Runtime
// errors quote the model path, so only the log line carries them.
fn detector_unavailable(e: DetectorError) -> SourceError {
    tracing::error!(error = %e, "face detector unavailable");
    SourceError::Unavailable(
        match e {
            DetectorError::ModelNotFound(_) => "face detector model not found",
            _ => "cannot load face detector model",
        }
        .to_string(),
    )
}

fn encoder_unavailable(e: EncoderError) -> SourceError {
    tracing::error!(error = %e, "face encoder unavailable");
    SourceError::Unavailable(
        match e {
            EncoderError::ModelNotFound(_) => "face encoder model not found",
            _ => "cannot load face encoder model",
        }
        .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn missing_models() -> SourceConfig {
        SourceConfig {
            detector_model: PathBuf::from("/nonexistent/det_10g.onnx"),
            encoder_model: PathBuf::from("/nonexistent/face_encoder.onnx"),
            detection_threshold: 0.5,
            encoder_input_size: 150,
            normalize_embeddings: false,
            intra_threads: 1,
        }
    }

    #[test]
    fn test_lazy_source_does_not_load() {
        let source = OnnxEmbeddingSource::new(missing_models());
        assert!(!source.is_loaded());
    }

    #[test]
    fn test_missing_model_is_unavailable() {
        let err = OnnxEmbeddingSource::load(missing_models()).err().unwrap();
        assert_eq!(
            err,
            SourceError::Unavailable("face detector model not found".into())
        );
    }

    #[test]
    fn test_extract_with_missing_model_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.png");
        RgbImage::new(4, 4).save(&path).unwrap();

        let mut source = OnnxEmbeddingSource::new(missing_models());
        let err = source.extract_embeddings(&path).unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));
    }

    #[test]
    fn test_decode_garbage_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-image.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        let err = decode(&path).unwrap_err();
        match err {
            SourceError::Extraction(msg) => assert!(msg.starts_with("cannot decode image")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_failure_detail_hides_paths() {
        let err = detector_unavailable(DetectorError::InferenceFailed(
            "Load model from /home/alice/models/det_10g.onnx failed".into(),
        ));
        assert_eq!(err, SourceError::Unavailable("cannot load face detector model".into()));

        let err = encoder_unavailable(EncoderError::InferenceFailed(
            "/home/alice/models/face_encoder.onnx: bad graph".into(),
        ));
        assert_eq!(err, SourceError::Unavailable("cannot load face encoder model".into()));
    }

    #[test]
    fn test_corrupt_model_message_has_no_path() {
        let dir = tempfile::tempdir().unwrap();
        let detector_model = dir.path().join("det_10g.onnx");
        std::fs::write(&detector_model, b"this is not an onnx graph").unwrap();

        let config = SourceConfig {
            detector_model,
            ..missing_models()
        };
        let err = OnnxEmbeddingSource::load(config).err().unwrap();
        let SourceError::Unavailable(detail) = err else {
            panic!("expected unavailable, got {err:?}");
        };
        assert_eq!(detail, "cannot load face detector model");

        let dir_name = dir.path().to_string_lossy().into_owned();
        let message = facecheck_core::VerifyError::CollaboratorUnavailable(detail).to_string();
        assert!(!message.contains(&dir_name));
        assert!(!message.contains(".onnx"));
    }
}
