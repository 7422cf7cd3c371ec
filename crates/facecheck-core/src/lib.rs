//! facecheck-core — one-to-one face match decision pipeline.
//!
//! Takes face embeddings from an [`EmbeddingSource`], enforces one face per
//! image, scores the pair by Euclidean distance, maps the distance onto a
//! 0–100 confidence curve and thresholds it into a match verdict. Every
//! outcome is reported as a flat [`ComparisonResult`].

pub mod confidence;
pub mod error;
pub mod pipeline;
pub mod result;
pub mod scoring;
pub mod source;
pub mod types;
pub mod validate;

pub use confidence::{confidence_from_distance, is_match, MATCH_THRESHOLD};
pub use error::VerifyError;
pub use pipeline::{compare_faces, verify};
pub use result::{ComparisonResult, Verification};
pub use source::{EmbeddingSource, SourceError};
pub use types::{Embedding, FaceSet, ImageRole};
