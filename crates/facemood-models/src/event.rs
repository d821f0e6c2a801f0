//! Host notification envelopes.
//!
//! Emitted by the channel-backed host adapter and written as JSON lines by
//! the CLI.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::emotion::Emotion;
use crate::geometry::Dimensions;

/// Description of an acquired camera stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StreamInfo {
    /// Stream identifier assigned by the camera subsystem
    pub id: String,
    /// Capture dimensions
    pub dimensions: Dimensions,
}

/// Notification delivered to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SensorEvent {
    /// Camera stream acquired and attached
    VideoStream {
        stream: StreamInfo,
        timestamp: DateTime<Utc>,
    },

    /// First face detected; fires once per sensor instance
    Running { timestamp: DateTime<Utc> },

    /// Confirmed emotion change
    Emotion {
        emotion: Emotion,
        timestamp: DateTime<Utc>,
    },
}

impl SensorEvent {
    pub fn video_stream(stream: StreamInfo) -> Self {
        Self::VideoStream {
            stream,
            timestamp: Utc::now(),
        }
    }

    pub fn running() -> Self {
        Self::Running {
            timestamp: Utc::now(),
        }
    }

    pub fn emotion(emotion: Emotion) -> Self {
        Self::Emotion {
            emotion,
            timestamp: Utc::now(),
        }
    }

    /// Event type name as used in the JSON `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            SensorEvent::VideoStream { .. } => "video_stream",
            SensorEvent::Running { .. } => "running",
            SensorEvent::Emotion { .. } => "emotion",
        }
    }
}
