use crate::confidence::{self, round_to};
use crate::error::VerifyError;
use serde::{Deserialize, Serialize};

/// Decimal places kept for the reported distance.
const DISTANCE_DIGITS: i32 = 4;

pub const MATCH_MESSAGE: &str = "match";
pub const NO_MATCH_MESSAGE: &str = "no match";

/// Outcome of a successful comparison, before it is flattened for reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verification {
    /// Unrounded Euclidean distance.
    pub distance: f64,
    /// Confidence percentage, rounded to 2 decimals.
    pub confidence: f64,
    pub matched: bool,
}

impl Verification {
    pub fn from_distance(distance: f64) -> Self {
        let confidence = confidence::confidence_from_distance(distance);
        Self {
            distance,
            confidence,
            matched: confidence::is_match(confidence),
        }
    }
}

/// The single flat record reported for every invocation.
///
/// Failures are distinguished only by `message`; they never carry `distance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub success: bool,
    #[serde(rename = "match")]
    pub matched: bool,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    pub message: String,
}

impl ComparisonResult {
    pub fn failure(err: &VerifyError) -> Self {
        Self {
            success: false,
            matched: false,
            confidence: 0.0,
            distance: None,
            message: err.to_string(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"success":false,"match":false,"confidence":0,"message":"internal error: {}"}}"#,
                e.to_string().replace('"', "'")
            )
        })
    }
}

impl From<Verification> for ComparisonResult {
    fn from(v: Verification) -> Self {
        Self {
            success: true,
            matched: v.matched,
            confidence: v.confidence,
            distance: Some(round_to(v.distance, DISTANCE_DIGITS)),
            message: if v.matched { MATCH_MESSAGE } else { NO_MATCH_MESSAGE }.to_string(),
        }
    }
}

impl From<Result<Verification, VerifyError>> for ComparisonResult {
    fn from(outcome: Result<Verification, VerifyError>) -> Self {
        match outcome {
            Ok(v) => v.into(),
            Err(e) => ComparisonResult::failure(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageRole;

    #[test]
    fn test_failure_shape() {
        let r = ComparisonResult::failure(&VerifyError::NoFaceDetected(ImageRole::Captured));
        assert!(!r.success);
        assert!(!r.matched);
        assert_eq!(r.confidence, 0.0);
        assert!(r.distance.is_none());
        assert_eq!(r.message, "no face detected in captured");
    }

    #[test]
    fn test_failure_json_has_no_distance() {
        let r = ComparisonResult::failure(&VerifyError::MissingFile(ImageRole::Reference));
        let v: serde_json::Value = serde_json::from_str(&r.to_json()).unwrap();
        let obj = v.as_object().unwrap();
        assert!(!obj.contains_key("distance"));
        assert_eq!(obj["success"], false);
        assert_eq!(obj["match"], false);
        assert_eq!(obj["confidence"].as_f64(), Some(0.0));
        assert_eq!(obj["message"], "reference image not found");
    }

    #[test]
    fn test_success_from_distance() {
        let r = ComparisonResult::from(Verification::from_distance(0.412345678));
        assert!(r.success);
        assert!(r.matched);
        assert_eq!(r.distance, Some(0.4123));
        assert_eq!(r.message, MATCH_MESSAGE);

        let r = ComparisonResult::from(Verification::from_distance(0.6));
        assert!(r.success);
        assert!(!r.matched);
        assert_eq!(r.confidence, 37.89);
        assert_eq!(r.message, NO_MATCH_MESSAGE);
    }

    #[test]
    fn test_success_json_fields() {
        let r = ComparisonResult::from(Verification::from_distance(0.0));
        let v: serde_json::Value = serde_json::from_str(&r.to_json()).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["match"], true);
        assert_eq!(v["confidence"].as_f64(), Some(100.0));
        assert_eq!(v["distance"].as_f64(), Some(0.0));
    }
}
