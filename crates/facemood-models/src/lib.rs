//! Shared data models for the facemood emotion sensor.
//!
//! This crate provides Serde-serializable types for:
//! - Emotion labels and per-frame expression scores
//! - Detection boxes and their mirrored display form
//! - Sensor lifecycle and loop states
//! - Host-facing options and event envelopes

pub mod detection;
pub mod emotion;
pub mod event;
pub mod geometry;
pub mod lifecycle;
pub mod options;
pub mod session;

// Re-export common types
pub use detection::DetectionFrame;
pub use emotion::{Emotion, EmotionParseError, EmotionState, ExpressionScores};
pub use event::{SensorEvent, StreamInfo};
pub use geometry::{Corners, DetectionBox, Dimensions, MirroredBox, Point};
pub use lifecycle::{LifecycleState, LoopState};
pub use options::{OptionsError, SensorOptions};
pub use session::SessionId;
