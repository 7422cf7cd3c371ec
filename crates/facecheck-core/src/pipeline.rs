//! The comparison pipeline: existence checks, extraction, validation, scoring.

use crate::error::VerifyError;
use crate::result::{ComparisonResult, Verification};
use crate::scoring;
use crate::source::EmbeddingSource;
use crate::types::{Embedding, ImageRole};
use crate::validate;
use std::path::Path;

/// Compare `reference` against `captured`, reporting every outcome as a result.
///
/// Never fails and never panics on domain errors; use [`verify`] for the typed
/// error.
pub fn compare_faces<S>(source: &mut S, reference: &Path, captured: &Path) -> ComparisonResult
where
    S: EmbeddingSource + ?Sized,
{
    let outcome = verify(source, reference, captured);
    match &outcome {
        Ok(v) => tracing::info!(
            distance = v.distance,
            confidence = v.confidence,
            matched = v.matched,
            "comparison finished"
        ),
        Err(e) => tracing::warn!(error = %e, "comparison failed"),
    }
    outcome.into()
}

/// Run the pipeline and return the verdict or the first failure.
///
/// Checks run strictly reference-first: a defective reference image is
/// reported without the captured image ever being extracted.
pub fn verify<S>(source: &mut S, reference: &Path, captured: &Path) -> Result<Verification, VerifyError>
where
    S: EmbeddingSource + ?Sized,
{
    if !reference.exists() {
        return Err(VerifyError::MissingFile(ImageRole::Reference));
    }
    if !captured.exists() {
        return Err(VerifyError::MissingFile(ImageRole::Captured));
    }

    let reference_face = extract_single(source, ImageRole::Reference, reference)?;
    let captured_face = extract_single(source, ImageRole::Captured, captured)?;

    let distance = scoring::euclidean_distance(&reference_face, &captured_face)
        .map_err(|e| VerifyError::Internal(e.to_string()))?;

    Ok(Verification::from_distance(distance))
}

fn extract_single<S>(source: &mut S, role: ImageRole, image: &Path) -> Result<Embedding, VerifyError>
where
    S: EmbeddingSource + ?Sized,
{
    let faces = source
        .extract_embeddings(image)
        .map_err(|e| VerifyError::from_source(role, e))?;
    tracing::debug!(%role, faces = faces.len(), "embeddings extracted");
    validate::single_face(role, faces)
}
