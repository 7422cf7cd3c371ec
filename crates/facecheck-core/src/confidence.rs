//! Distance → confidence curve and the match threshold.
//!
//! The curve is non-linear so the ambiguous 0.4–0.7 distance band spreads over
//! a wide confidence range, while distances at or past 0.8 collapse towards
//! low scores. Only distances of 1.0 and beyond report exactly 0.

/// Minimum confidence (inclusive) for a match verdict.
pub const MATCH_THRESHOLD: f64 = 60.0;

/// At and beyond this distance confidence is 0.
const ZERO_CONFIDENCE_DISTANCE: f64 = 1.0;
/// Start of the near-linear tail.
const TAIL_DISTANCE: f64 = 0.8;
/// Confidence at the start of the tail, and the floor of the main curve.
const TAIL_CONFIDENCE: f64 = 20.0;
const CURVE_EXPONENT: f64 = 0.7;

/// Map a distance to a confidence percentage in [0, 100], rounded to 2 decimals.
pub fn confidence_from_distance(distance: f64) -> f64 {
    let raw = if distance >= ZERO_CONFIDENCE_DISTANCE {
        0.0
    } else if distance >= TAIL_DISTANCE {
        (TAIL_CONFIDENCE - (distance - TAIL_DISTANCE) * 100.0).max(0.0)
    } else {
        let curve = 100.0 * (1.0 - distance / TAIL_DISTANCE).powf(CURVE_EXPONENT);
        curve.clamp(TAIL_CONFIDENCE, 100.0)
    };
    round_to(raw, 2)
}

/// Match verdict for an already rounded confidence.
pub fn is_match(confidence: f64) -> bool {
    confidence >= MATCH_THRESHOLD
}

/// Round half away from zero to `digits` decimal places.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}
