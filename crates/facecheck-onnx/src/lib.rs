//! facecheck-onnx — ONNX Runtime embedding source for facecheck.
//!
//! Decodes the image, detects faces with SCRFD, aligns each face to a square
//! chip and encodes it. Every detected face yields one embedding; deciding
//! what to do with zero or several faces is left to `facecheck-core`.

pub mod alignment;
pub mod config;
pub mod detector;
pub mod encoder;
pub mod source;

pub use config::{default_model_dir, SourceConfig};
pub use detector::{Detection, FaceDetector};
pub use encoder::FaceEncoder;
pub use source::OnnxEmbeddingSource;
