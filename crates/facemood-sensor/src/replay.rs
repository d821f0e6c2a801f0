//! Replay collaborators.
//!
//! [`ReplayEngine`] answers detection calls from a recorded JSON script and
//! [`SyntheticCamera`] hands out streams of blank frames. Together they run
//! the sensor without a camera or inference backend.
//!
//! Script format:
//!
//! ```json
//! {
//!   "frames": [null, {"box": {...}, "image_dims": {...}, "expressions": {"happy": 0.6}}],
//!   "repeat": true,
//!   "latency_ms": 30
//! }
//! ```
//!
//! `null` entries are frames without a face.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use facemood_models::{DetectionFrame, Dimensions};

use crate::camera::{CameraSource, CameraStream, VideoFrame};
use crate::engine::{Capability, FaceAnalysisEngine};
use crate::error::{SensorError, SensorResult};

/// Recorded sequence of detection results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    /// One entry per inference call; `None` means no face
    pub frames: Vec<Option<DetectionFrame>>,
    /// Start over after the last frame instead of reporting no face
    #[serde(default)]
    pub repeat: bool,
    /// Simulated inference latency
    #[serde(default)]
    pub latency_ms: u64,
}

impl ReplayScript {
    pub fn new(frames: Vec<Option<DetectionFrame>>) -> Self {
        Self {
            frames,
            repeat: false,
            latency_ms: 0,
        }
    }

    /// Parse and validate a script.
    pub fn from_json(json: &str) -> SensorResult<Self> {
        let script: Self = serde_json::from_str(json)?;
        script.validate()?;
        Ok(script)
    }

    /// Read a script file.
    pub async fn load(path: impl AsRef<Path>) -> SensorResult<Self> {
        let path = path.as_ref();
        debug!("Reading replay script {}", path.display());
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> SensorResult<()> {
        if self.frames.is_empty() {
            return Err(SensorError::InvalidScript("script has no frames".to_string()));
        }
        Ok(())
    }
}

/// Analysis engine that replays a script.
#[derive(Debug)]
pub struct ReplayEngine {
    script: ReplayScript,
    cursor: AtomicUsize,
    fail_on: Option<Capability>,
}

impl ReplayEngine {
    pub fn from_script(script: ReplayScript) -> SensorResult<Self> {
        script.validate()?;
        Ok(Self {
            script,
            cursor: AtomicUsize::new(0),
            fail_on: None,
        })
    }

    /// Load a script file into a new engine.
    pub async fn load(path: impl AsRef<Path>) -> SensorResult<Self> {
        let script = ReplayScript::load(path).await?;
        info!(
            frames = script.frames.len(),
            repeat = script.repeat,
            "Loaded replay script"
        );
        Self::from_script(script)
    }

    /// Make loading `capability` fail, as if its weights were missing.
    pub fn with_load_failure(mut self, capability: Capability) -> Self {
        self.fail_on = Some(capability);
        self
    }

    /// Number of detection calls answered so far.
    pub fn calls(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    /// True once a non-repeating script has run out of frames.
    pub fn is_exhausted(&self) -> bool {
        !self.script.repeat && self.calls() >= self.script.frames.len()
    }
}

#[async_trait]
impl FaceAnalysisEngine for ReplayEngine {
    async fn load_model(&self, capability: Capability, asset_root: &Path) -> SensorResult<()> {
        if self.fail_on == Some(capability) {
            return Err(SensorError::model_load(
                capability,
                format!("no weights under {}", asset_root.display()),
            ));
        }
        debug!("Replay engine accepted {} model", capability);
        Ok(())
    }

    async fn detect_single_face(&self, frame: &VideoFrame) -> SensorResult<Option<DetectionFrame>> {
        if frame.dimensions().is_empty() {
            return Err(SensorError::detection(format!(
                "frame {} has no pixels",
                frame.sequence
            )));
        }
        if self.script.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.script.latency_ms)).await;
        }

        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        let len = self.script.frames.len();
        let entry = if index < len {
            &self.script.frames[index]
        } else if self.script.repeat {
            &self.script.frames[index % len]
        } else {
            return Ok(None);
        };

        debug!(frame = frame.sequence, index, face = entry.is_some(), "Replayed detection");
        Ok(entry.clone())
    }

    fn name(&self) -> &'static str {
        "replay"
    }
}

/// Camera that produces blank frames of a fixed size.
#[derive(Debug)]
pub struct SyntheticCamera {
    dimensions: Dimensions,
    denied: Option<String>,
    streams: Mutex<Vec<Arc<SyntheticStream>>>,
}

impl SyntheticCamera {
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            denied: None,
            streams: Mutex::new(Vec::new()),
        }
    }

    /// A camera that refuses access.
    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            dimensions: Dimensions::new(0, 0),
            denied: Some(reason.into()),
            streams: Mutex::new(Vec::new()),
        }
    }

    fn streams(&self) -> std::sync::MutexGuard<'_, Vec<Arc<SyntheticStream>>> {
        self.streams.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of streams handed out.
    pub fn acquired(&self) -> usize {
        self.streams().len()
    }

    /// Number of handed-out streams not yet released.
    pub fn active(&self) -> usize {
        self.streams().iter().filter(|s| !s.is_released()).count()
    }
}

#[async_trait]
impl CameraSource for SyntheticCamera {
    async fn acquire(&self, requested: Option<Dimensions>) -> SensorResult<Arc<dyn CameraStream>> {
        if let Some(reason) = &self.denied {
            return Err(SensorError::camera_unavailable(reason.clone()));
        }

        let dimensions = requested.unwrap_or(self.dimensions);
        let mut streams = self.streams();
        let stream = Arc::new(SyntheticStream::new(
            format!("synthetic-{}", streams.len()),
            dimensions,
        ));
        streams.push(Arc::clone(&stream));

        info!(
            stream = stream.id(),
            width = dimensions.width,
            height = dimensions.height,
            "Synthetic camera stream acquired"
        );
        Ok(stream)
    }
}

/// Stream handed out by [`SyntheticCamera`].
#[derive(Debug)]
pub struct SyntheticStream {
    id: String,
    dimensions: Dimensions,
    sequence: AtomicU64,
    released: AtomicBool,
}

impl SyntheticStream {
    fn new(id: String, dimensions: Dimensions) -> Self {
        Self {
            id,
            dimensions,
            sequence: AtomicU64::new(0),
            released: AtomicBool::new(false),
        }
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl CameraStream for SyntheticStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn current_frame(&self) -> Option<VideoFrame> {
        if self.is_released() {
            return None;
        }
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        Some(VideoFrame::new(
            sequence,
            RgbImage::new(self.dimensions.width, self.dimensions.height),
        ))
    }

    fn release(&self) {
        if !self.released.swap(true, Ordering::SeqCst) {
            debug!(stream = %self.id, "Synthetic camera stream released");
        }
    }
}
