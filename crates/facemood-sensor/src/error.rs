//! Error types for sensor operations.

use facemood_models::{LifecycleState, OptionsError};
use thiserror::Error;

use crate::engine::Capability;

/// Result type for sensor operations.
pub type SensorResult<T> = Result<T, SensorError>;

/// Errors that can occur while running the sensor.
///
/// A missing face in a frame is not an error; the engine reports it as
/// `Ok(None)`.
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("Failed to load {capability} model: {message}")]
    ModelLoad {
        capability: Capability,
        message: String,
    },

    #[error("Face detection failed: {0}")]
    Detection(String),

    #[error("Sensor is already active")]
    AlreadyActive,

    #[error("Sensor has been deactivated")]
    Deactivated,

    #[error("Invalid lifecycle transition from {from} to {to}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },

    #[error("Invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),

    #[error("Invalid replay script: {0}")]
    InvalidScript(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl SensorError {
    /// Create a camera failure error.
    pub fn camera_unavailable(message: impl Into<String>) -> Self {
        Self::CameraUnavailable(message.into())
    }

    /// Create a model load failure for one capability.
    pub fn model_load(capability: Capability, message: impl Into<String>) -> Self {
        Self::ModelLoad {
            capability,
            message: message.into(),
        }
    }

    /// Create a detection failure error.
    pub fn detection(message: impl Into<String>) -> Self {
        Self::Detection(message.into())
    }

    /// Errors that abort activation. The host decides whether to retry.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SensorError::CameraUnavailable(_)
                | SensorError::ModelLoad { .. }
                | SensorError::InvalidOptions(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_load_message_names_capability() {
        let err = SensorError::model_load(Capability::Expression, "missing weights");
        assert_eq!(
            err.to_string(),
            "Failed to load face_expression model: missing weights"
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_detection_is_not_fatal() {
        assert!(!SensorError::detection("timeout").is_fatal());
        assert!(SensorError::camera_unavailable("denied").is_fatal());
    }
}
