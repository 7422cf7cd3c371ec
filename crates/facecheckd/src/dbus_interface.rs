use crate::engine::{EngineError, EngineHandle};
use facecheck_core::{ComparisonResult, VerifyError};
use std::path::PathBuf;
use zbus::interface;

pub const BUS_NAME: &str = "org.facecheck.FaceCheck1";
pub const OBJECT_PATH: &str = "/org/facecheck/FaceCheck1";

/// D-Bus interface for the facecheck daemon.
///
/// Every comparison method answers with a JSON `ComparisonResult`; domain
/// failures are never D-Bus errors.
pub struct FaceCheckService {
    engine: EngineHandle,
    bus: &'static str,
}

impl FaceCheckService {
    pub fn new(engine: EngineHandle, bus: &'static str) -> Self {
        Self { engine, bus }
    }
}

#[interface(name = "org.facecheck.FaceCheck1")]
impl FaceCheckService {
    /// Compare a reference image file against a captured image file.
    async fn compare(&self, reference: &str, captured: &str) -> zbus::fdo::Result<String> {
        tracing::info!("compare requested");
        let outcome = self
            .engine
            .compare(PathBuf::from(reference), PathBuf::from(captured))
            .await;
        Ok(render(outcome))
    }

    /// Compare a reference image file against base64-encoded captured image data.
    async fn compare_encoded(&self, reference: &str, captured_base64: &str) -> zbus::fdo::Result<String> {
        tracing::info!(payload_len = captured_base64.len(), "compare_encoded requested");
        let outcome = self
            .engine
            .compare_encoded(PathBuf::from(reference), captured_base64.to_string())
            .await;
        Ok(render(outcome))
    }

    /// Return daemon status information.
    async fn status(&self) -> zbus::fdo::Result<String> {
        let models_loaded = self.engine.models_loaded().await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "engine unavailable");
            false
        });
        Ok(status_json(self.bus, models_loaded))
    }
}

fn render(outcome: Result<ComparisonResult, EngineError>) -> String {
    let result = outcome.unwrap_or_else(|e| {
        tracing::error!(error = %e, "engine unavailable");
        ComparisonResult::failure(&VerifyError::Internal(e.to_string()))
    });
    result.to_json()
}

fn status_json(bus: &str, models_loaded: bool) -> String {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "bus": bus,
        "models_loaded": models_loaded,
        "match_threshold": facecheck_core::MATCH_THRESHOLD,
    })
    .to_string()
}
