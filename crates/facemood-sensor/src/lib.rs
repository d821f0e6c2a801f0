#![deny(unreachable_patterns)]
//! Real-time facial emotion sensor.
//!
//! This crate provides:
//! - Lifecycle control of one sensor instance (camera, models, loop)
//! - The cooperative detection loop with a fixed 50 ms reschedule delay
//! - Confidence-threshold emotion selection with implicit hysteresis
//! - Mirrored overlay geometry for a horizontally flipped video
//! - Collaborator traits for the analysis engine and the camera
//! - Replay collaborators for offline runs and tests

pub mod camera;
pub mod detection_loop;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod host;
pub mod layout;
pub mod lifecycle;
pub mod logging;
pub mod metrics;
pub mod model_loader;
pub mod overlay;
pub mod replay;
pub mod selector;

#[cfg(test)]
mod testing;

pub use camera::{CameraSource, CameraStream, VideoFrame, VideoSurface};
pub use detection_loop::{DetectionLoop, IterationOutcome, LoopReport, RESCHEDULE_DELAY};
pub use engine::{Capability, FaceAnalysisEngine};
pub use error::{SensorError, SensorResult};
pub use geometry::{mirror_box, resize_detection};
pub use host::{ChannelHost, HostCallbacks};
pub use layout::{Centering, Layout, SurfaceSize};
pub use lifecycle::LifecycleController;
pub use logging::SessionLogger;
pub use model_loader::{ModelBundle, ModelConfig, ModelLoader, DEFAULT_MODEL_DIR};
pub use overlay::{render_overlay, OverlayFrame, OverlaySink, MIN_LABEL_CONFIDENCE};
pub use replay::{ReplayEngine, ReplayScript, SyntheticCamera};
pub use selector::{select, EmotionTracker, Selection, EMOTION_THRESHOLD};
