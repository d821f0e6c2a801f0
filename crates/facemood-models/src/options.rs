//! Host-supplied sensor options.
//!
//! Only presentation is affected by these; the detection loop cadence and the
//! emotion threshold are fixed.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Dimensions;

/// Options recognized by the sensor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SensorOptions {
    /// Narrow-screen layout (caps container width)
    #[serde(default)]
    pub mobile: bool,
    /// Fixed overlay/video width in pixels; used only together with `height`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Fixed overlay/video height in pixels; used only together with `width`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Skip centering the container
    #[serde(default)]
    pub no_center: bool,
    /// Requested camera capture width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webcam_width: Option<u32>,
    /// Requested camera capture height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webcam_height: Option<u32>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("{0} must be greater than zero")]
    ZeroDimension(&'static str),
}

impl SensorOptions {
    /// Fixed display size, present only when both `width` and `height` are set.
    pub fn fixed_size(&self) -> Option<Dimensions> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => Some(Dimensions::new(width, height)),
            _ => None,
        }
    }

    /// Requested capture size, present only when both sides are set.
    pub fn webcam_size(&self) -> Option<Dimensions> {
        match (self.webcam_width, self.webcam_height) {
            (Some(width), Some(height)) => Some(Dimensions::new(width, height)),
            _ => None,
        }
    }

    /// Validate the options.
    pub fn validate(&self) -> Result<(), OptionsError> {
        let fields = [
            ("width", self.width),
            ("height", self.height),
            ("webcamWidth", self.webcam_width),
            ("webcamHeight", self.webcam_height),
        ];

        for (name, value) in fields {
            if value == Some(0) {
                return Err(OptionsError::ZeroDimension(name));
            }
        }

        Ok(())
    }
}
