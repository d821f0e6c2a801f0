//! Sensor metrics collection.
//!
//! Provides standardized metrics for monitoring the detection loop:
//! - Inference latency histogram
//! - Frame outcome counters (face, no face, engine error, discarded)
//! - Emotion change counter by label
//! - Model load duration and failures by capability

use metrics::{counter, histogram};

use facemood_models::Emotion;

use crate::engine::Capability;

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Inference call latency in seconds.
    pub const INFERENCE_SECONDS: &str = "facemood_inference_seconds";

    /// Loop iterations by outcome.
    pub const FRAMES_TOTAL: &str = "facemood_frames_total";

    /// Confirmed emotion changes by label.
    pub const EMOTION_CHANGES_TOTAL: &str = "facemood_emotion_changes_total";

    /// Model load duration in seconds by capability.
    pub const MODEL_LOAD_SECONDS: &str = "facemood_model_load_seconds";

    /// Model load failures by capability.
    pub const MODEL_LOAD_FAILURES_TOTAL: &str = "facemood_model_load_failures_total";
}

// =============================================================================
// Recording Functions
// =============================================================================

/// Record one inference call and its outcome.
pub fn record_frame(outcome: &'static str, latency_secs: f64) {
    histogram!(names::INFERENCE_SECONDS).record(latency_secs);
    counter!(names::FRAMES_TOTAL, "outcome" => outcome).increment(1);
}

/// Record a confirmed emotion change.
pub fn record_emotion_change(emotion: Emotion) {
    counter!(names::EMOTION_CHANGES_TOTAL, "emotion" => emotion.as_str()).increment(1);
}

/// Record a successful capability load.
pub fn record_model_load(capability: Capability, duration_secs: f64) {
    histogram!(names::MODEL_LOAD_SECONDS, "capability" => capability.as_str()).record(duration_secs);
}

/// Record a failed capability load.
pub fn record_model_load_failure(capability: Capability) {
    counter!(names::MODEL_LOAD_FAILURES_TOTAL, "capability" => capability.as_str()).increment(1);
}

// =============================================================================
// Tests
// =============================================================================
