//! Exactly-one-face precondition.

use crate::error::VerifyError;
use crate::types::{Embedding, FaceSet, ImageRole};

/// How many faces an image produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceCount {
    Empty,
    Single,
    Multiple(usize),
}

impl FaceCount {
    pub fn of(faces: &[Embedding]) -> Self {
        match faces.len() {
            0 => FaceCount::Empty,
            1 => FaceCount::Single,
            n => FaceCount::Multiple(n),
        }
    }
}

/// Take the single embedding out of `faces`, or fail for `role`.
///
/// Multiple faces are rejected rather than picking the largest: an image with
/// more than one face is ambiguous and is never compared.
pub fn single_face(role: ImageRole, faces: FaceSet) -> Result<Embedding, VerifyError> {
    match FaceCount::of(&faces) {
        FaceCount::Empty => Err(VerifyError::NoFaceDetected(role)),
        FaceCount::Multiple(n) => {
            tracing::debug!(%role, faces = n, "rejecting image with several faces");
            Err(VerifyError::MultipleFacesDetected(role))
        }
        FaceCount::Single => faces
            .into_iter()
            .next()
            .ok_or(VerifyError::NoFaceDetected(role)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emb(v: f32) -> Embedding {
        Embedding::new(vec![v; 4])
    }

    #[test]
    fn test_face_count_classification() {
        assert_eq!(FaceCount::of(&[]), FaceCount::Empty);
        assert_eq!(FaceCount::of(&[emb(0.0)]), FaceCount::Single);
        assert_eq!(FaceCount::of(&[emb(0.0), emb(1.0), emb(2.0)]), FaceCount::Multiple(3));
    }

    #[test]
    fn test_single_face_ok() {
        let face = single_face(ImageRole::Reference, vec![emb(0.5)]).unwrap();
        assert_eq!(face, emb(0.5));
    }

    #[test]
    fn test_single_face_empty() {
        let err = single_face(ImageRole::Captured, vec![]).unwrap_err();
        assert_eq!(err, VerifyError::NoFaceDetected(ImageRole::Captured));
    }

    #[test]
    fn test_single_face_multiple() {
        let err = single_face(ImageRole::Reference, vec![emb(0.1), emb(0.2)]).unwrap_err();
        assert_eq!(err, VerifyError::MultipleFacesDetected(ImageRole::Reference));
    }
}
