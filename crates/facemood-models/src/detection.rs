//! Single-face detection results.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::emotion::ExpressionScores;
use crate::geometry::{DetectionBox, Dimensions};

/// Result of one detect-with-expressions call.
///
/// Only lives for one loop iteration; nothing keeps it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetectionFrame {
    /// Face box in the pixel space of `image_dims`
    #[serde(rename = "box")]
    pub bbox: DetectionBox,
    /// Dimensions of the image the engine analyzed
    pub image_dims: Dimensions,
    /// Face detection score
    #[serde(default = "default_score")]
    pub score: f64,
    /// Expression classifier output
    pub expressions: ExpressionScores,
}

fn default_score() -> f64 {
    1.0
}

impl DetectionFrame {
    pub fn new(bbox: DetectionBox, image_dims: Dimensions, expressions: ExpressionScores) -> Self {
        Self {
            bbox,
            image_dims,
            score: default_score(),
            expressions,
        }
    }
}
