//! The face embedding capability consumed by the pipeline.

use crate::types::FaceSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The extraction backend itself cannot run (missing model, missing runtime).
    #[error("embedding backend unavailable: {0}")]
    Unavailable(String),
    /// The backend ran but failed on this particular image.
    #[error("embedding extraction failed: {0}")]
    Extraction(String),
}

/// Produces zero, one or many face embeddings for an image.
///
/// Implementations may hold expensive state (loaded models) and therefore take
/// `&mut self`, but must not carry anything from one image over to the next.
pub trait EmbeddingSource {
    fn extract_embeddings(&mut self, image: &Path) -> Result<FaceSet, SourceError>;

    /// Whether the backend's models are resident. Sources without lazy state
    /// are always ready.
    fn is_loaded(&self) -> bool {
        true
    }
}

impl<S: EmbeddingSource + ?Sized> EmbeddingSource for Box<S> {
    fn extract_embeddings(&mut self, image: &Path) -> Result<FaceSet, SourceError> {
        (**self).extract_embeddings(image)
    }

    fn is_loaded(&self) -> bool {
        (**self).is_loaded()
    }
}
