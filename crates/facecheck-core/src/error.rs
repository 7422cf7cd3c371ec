use crate::source::SourceError;
use crate::types::ImageRole;
use thiserror::Error;

/// Usage line reported for malformed invocations.
pub const USAGE: &str = "usage: facecheck <reference> <captured>";

/// Every way a comparison can end without a verdict.
///
/// The `Display` output is the exact `message` reported to callers, who match
/// on it, so the strings are part of the public contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("invalid arguments: {}", USAGE)]
    BadInvocation,
    #[error("{0} image not found")]
    MissingFile(ImageRole),
    #[error("no face detected in {0}")]
    NoFaceDetected(ImageRole),
    #[error("multiple faces in {0}")]
    MultipleFacesDetected(ImageRole),
    #[error("face comparison library unavailable: {0}")]
    CollaboratorUnavailable(String),
    #[error("invalid captured image data")]
    InvalidImageData,
    #[error("internal error: {0}")]
    Internal(String),
}

impl VerifyError {
    /// Process exit status for this outcome. Only malformed invocations are fatal.
    pub fn exit_code(&self) -> i32 {
        match self {
            VerifyError::BadInvocation => 1,
            _ => 0,
        }
    }

    pub(crate) fn from_source(role: ImageRole, err: SourceError) -> Self {
        match err {
            SourceError::Unavailable(detail) => VerifyError::CollaboratorUnavailable(detail),
            SourceError::Extraction(detail) => {
                VerifyError::Internal(format!("{role} image: {detail}"))
            }
        }
    }
}
