use base64::{engine::general_purpose::STANDARD, Engine as _};
use facecheck_core::{ComparisonResult, EmbeddingSource, ImageRole, VerifyError};
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to spawn engine thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("engine thread exited")]
    ChannelClosed,
}

/// Messages sent from D-Bus handlers to the engine thread.
enum EngineRequest {
    Compare {
        reference: PathBuf,
        captured: PathBuf,
        reply: oneshot::Sender<ComparisonResult>,
    },
    CompareEncoded {
        reference: PathBuf,
        captured_base64: String,
        reply: oneshot::Sender<ComparisonResult>,
    },
    Status {
        reply: oneshot::Sender<bool>,
    },
}

/// Clone-safe handle to the engine thread.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineRequest>,
}

impl EngineHandle {
    /// Compare two image files.
    pub async fn compare(&self, reference: PathBuf, captured: PathBuf) -> Result<ComparisonResult, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(EngineRequest::Compare {
                reference,
                captured,
                reply,
            })
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        rx.await.map_err(|_| EngineError::ChannelClosed)
    }

    /// Compare a reference file against a base64-encoded captured image.
    pub async fn compare_encoded(
        &self,
        reference: PathBuf,
        captured_base64: String,
    ) -> Result<ComparisonResult, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(EngineRequest::CompareEncoded {
                reference,
                captured_base64,
                reply,
            })
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        rx.await.map_err(|_| EngineError::ChannelClosed)
    }

    /// Whether the engine's source has its models resident.
    pub async fn models_loaded(&self) -> Result<bool, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(EngineRequest::Status { reply })
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        rx.await.map_err(|_| EngineError::ChannelClosed)
    }
}

/// Spawn the engine on a dedicated OS thread that owns `source`.
///
/// Requests are served one at a time in arrival order. Nothing derived from
/// one request (embeddings, staged images) outlives it, and a panic while
/// serving one request is reported on that request alone.
pub fn spawn_engine<S>(mut source: S) -> Result<EngineHandle, EngineError>
where
    S: EmbeddingSource + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<EngineRequest>(8);

    std::thread::Builder::new()
        .name("facecheck-engine".into())
        .spawn(move || {
            tracing::info!("engine thread started");
            while let Some(req) = rx.blocking_recv() {
                match req {
                    EngineRequest::Compare {
                        reference,
                        captured,
                        reply,
                    } => {
                        let result = contained(|| {
                            facecheck_core::compare_faces(&mut source, &reference, &captured)
                        });
                        let _ = reply.send(result);
                    }
                    EngineRequest::CompareEncoded {
                        reference,
                        captured_base64,
                        reply,
                    } => {
                        let result = contained(|| run_compare_encoded(&mut source, &reference, &captured_base64));
                        let _ = reply.send(result);
                    }
                    EngineRequest::Status { reply } => {
                        let _ = reply.send(source.is_loaded());
                    }
                }
            }
            tracing::info!("engine thread exiting");
        })?;

    Ok(EngineHandle { tx })
}

/// Run one request's work, turning a panic into an internal-error result.
fn contained<F>(work: F) -> ComparisonResult
where
    F: FnOnce() -> ComparisonResult,
{
    panic::catch_unwind(AssertUnwindSafe(work)).unwrap_or_else(|_| {
        tracing::error!("comparison panicked");
        ComparisonResult::failure(&VerifyError::Internal("unexpected panic".into()))
    })
}

/// Stage the captured image in a temporary file and compare it.
///
/// The reference is checked first so a missing reference wins over bad
/// captured data. The temporary file is removed when this returns.
fn run_compare_encoded<S>(source: &mut S, reference: &Path, captured_base64: &str) -> ComparisonResult
where
    S: EmbeddingSource + ?Sized,
{
    if !reference.exists() {
        return ComparisonResult::failure(&VerifyError::MissingFile(ImageRole::Reference));
    }

    let bytes = match decode_image_payload(captured_base64) {
        Some(b) => b,
        None => return ComparisonResult::failure(&VerifyError::InvalidImageData),
    };

    let staged = tempfile::Builder::new()
        .prefix("facecheck-captured-")
        .tempfile()
        .and_then(|mut f| {
            f.write_all(&bytes)?;
            f.flush()?;
            Ok(f)
        });
    let staged = match staged {
        Ok(f) => f,
        Err(e) => {
            tracing::error!(error = %e, "cannot stage captured image");
            return ComparisonResult::failure(&VerifyError::Internal(
                "cannot stage captured image".into(),
            ));
        }
    };

    facecheck_core::compare_faces(source, reference, staged.path())
}

/// Decode base64 image data, accepting an optional `data:...;base64,` prefix
/// and embedded whitespace. Empty payloads are rejected.
fn decode_image_payload(payload: &str) -> Option<Vec<u8>> {
    let body = match payload.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => payload,
    };
    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    match STANDARD.decode(compact) {
        Ok(bytes) if !bytes.is_empty() => Some(bytes),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "captured image payload is not base64");
            None
        }
    }
}
