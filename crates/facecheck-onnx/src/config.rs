use std::path::PathBuf;

/// ONNX source configuration, loaded from `FACECHECK_*` environment variables.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// SCRFD detection model.
    pub detector_model: PathBuf,
    /// Face encoder model.
    pub encoder_model: PathBuf,
    /// Minimum SCRFD score for a detection to count as a face.
    pub detection_threshold: f32,
    /// Side length of the aligned chip fed to the encoder.
    pub encoder_input_size: u32,
    /// L2-normalise embeddings before they leave the source.
    pub normalize_embeddings: bool,
    /// ONNX Runtime intra-op threads per session.
    pub intra_threads: usize,
}

impl SourceConfig {
    pub fn from_env() -> Self {
        let model_dir = std::env::var("FACECHECK_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_model_dir());

        Self {
            detector_model: env_path("FACECHECK_DETECTOR_MODEL")
                .unwrap_or_else(|| model_dir.join("det_10g.onnx")),
            encoder_model: env_path("FACECHECK_ENCODER_MODEL")
                .unwrap_or_else(|| model_dir.join("face_encoder.onnx")),
            detection_threshold: env_parse("FACECHECK_DETECTION_THRESHOLD", 0.5),
            encoder_input_size: env_parse("FACECHECK_ENCODER_INPUT_SIZE", 150),
            normalize_embeddings: std::env::var("FACECHECK_NORMALIZE_EMBEDDINGS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            intra_threads: env_parse("FACECHECK_INTRA_THREADS", 2),
        }
    }
}

/// `$XDG_DATA_HOME/facecheck/models`, falling back to `~/.local/share`.
pub fn default_model_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local/share")
        })
        .join("facecheck")
        .join("models")
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key).ok().filter(|v| !v.is_empty()).map(PathBuf::from)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
