//! Face analysis engine boundary.
//!
//! The engine is a black box: it loads its sub-models from an asset
//! directory and runs single-face detection with expression scores.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use facemood_models::DetectionFrame;

use crate::camera::VideoFrame;
use crate::error::SensorResult;

/// Sub-model required before detection can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Face localization (SSD MobileNet v1)
    FaceDetector,
    /// Age and gender estimation
    AgeGender,
    /// Expression classification
    Expression,
}

impl Capability {
    /// Required capabilities in load order.
    pub const REQUIRED: &'static [Capability] = &[
        Capability::FaceDetector,
        Capability::AgeGender,
        Capability::Expression,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::FaceDetector => "ssd_mobilenetv1",
            Capability::AgeGender => "age_gender",
            Capability::Expression => "face_expression",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Face analysis engine.
#[async_trait]
pub trait FaceAnalysisEngine: Send + Sync {
    /// Load one sub-model from `asset_root`.
    async fn load_model(&self, capability: Capability, asset_root: &Path) -> SensorResult<()>;

    /// Detect the most prominent face with expression scores.
    ///
    /// # Returns
    /// `Ok(None)` when no face is visible in the frame.
    async fn detect_single_face(&self, frame: &VideoFrame) -> SensorResult<Option<DetectionFrame>>;

    /// Engine name for logging.
    fn name(&self) -> &'static str;
}
