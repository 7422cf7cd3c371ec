//! Distance between two face embeddings.

use crate::types::Embedding;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("embedding dimension mismatch: {reference} vs {captured}")]
    DimensionMismatch { reference: usize, captured: usize },
    #[error("embedding is empty")]
    Empty,
    #[error("distance is not finite")]
    NonFinite,
}

/// Euclidean distance between `reference` and `captured`, accumulated in `f64`.
///
/// 0.0 means identical encodings. Symmetric in its arguments; the names only
/// matter for the error report.
pub fn euclidean_distance(reference: &Embedding, captured: &Embedding) -> Result<f64, ScoreError> {
    if reference.dim() != captured.dim() {
        return Err(ScoreError::DimensionMismatch {
            reference: reference.dim(),
            captured: captured.dim(),
        });
    }
    if reference.values.is_empty() {
        return Err(ScoreError::Empty);
    }

    let distance = reference
        .values
        .iter()
        .zip(captured.values.iter())
        .map(|(a, b)| {
            let d = f64::from(*a) - f64::from(*b);
            d * d
        })
        .sum::<f64>()
        .sqrt();

    if !distance.is_finite() {
        return Err(ScoreError::NonFinite);
    }
    Ok(distance)
}
