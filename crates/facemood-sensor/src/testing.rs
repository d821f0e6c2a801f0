//! Shared fakes for unit tests.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::RgbImage;
use tokio::sync::Notify;
use tokio::time::Instant;

use facemood_models::{DetectionBox, DetectionFrame, Dimensions, Emotion, ExpressionScores};

use crate::camera::{CameraStream, VideoFrame};
use crate::engine::{Capability, FaceAnalysisEngine};
use crate::error::SensorResult;
use crate::host::HostCallbacks;
use crate::model_loader::{ModelBundle, ModelConfig, ModelLoader};

/// A detection at (10, 20, 30, 40) in `dims`.
pub fn face<const N: usize>(dims: Dimensions, scores: [(Emotion, f64); N]) -> DetectionFrame {
    DetectionFrame::new(
        DetectionBox::new(10.0, 20.0, 30.0, 40.0),
        dims,
        ExpressionScores::from(scores),
    )
}

pub async fn loaded_bundle(engine: Arc<dyn FaceAnalysisEngine>) -> Arc<ModelBundle> {
    ModelLoader::new(engine, ModelConfig::default())
        .load()
        .await
        .unwrap()
}

/// Engine returning scripted results, then `Ok(None)` forever.
pub struct ScriptedEngine {
    results: Mutex<VecDeque<SensorResult<Option<DetectionFrame>>>>,
    calls: Mutex<Vec<Instant>>,
}

impl ScriptedEngine {
    pub fn new(results: Vec<SensorResult<Option<DetectionFrame>>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FaceAnalysisEngine for ScriptedEngine {
    async fn load_model(&self, _capability: Capability, _asset_root: &Path) -> SensorResult<()> {
        Ok(())
    }

    async fn detect_single_face(&self, _frame: &VideoFrame) -> SensorResult<Option<DetectionFrame>> {
        self.calls.lock().unwrap().push(Instant::now());
        self.results.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Engine whose inference blocks until the test releases it.
pub struct GatedEngine {
    detection: DetectionFrame,
    entered: Notify,
    gate: Notify,
    calls: AtomicUsize,
}

impl GatedEngine {
    pub fn new(detection: DetectionFrame) -> Self {
        Self {
            detection,
            entered: Notify::new(),
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Wait until an inference call is in flight.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Let the in-flight inference complete.
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FaceAnalysisEngine for GatedEngine {
    async fn load_model(&self, _capability: Capability, _asset_root: &Path) -> SensorResult<()> {
        Ok(())
    }

    async fn detect_single_face(&self, _frame: &VideoFrame) -> SensorResult<Option<DetectionFrame>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.gate.notified().await;
        Ok(Some(self.detection.clone()))
    }

    fn name(&self) -> &'static str {
        "gated"
    }
}

/// Stream producing blank frames of a fixed size.
pub struct StaticStream {
    dims: Dimensions,
    sequence: AtomicU64,
    released: AtomicBool,
}

impl StaticStream {
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            sequence: AtomicU64::new(0),
            released: AtomicBool::new(false),
        }
    }
}

impl CameraStream for StaticStream {
    fn id(&self) -> &str {
        "static"
    }

    fn dimensions(&self) -> Dimensions {
        self.dims
    }

    fn current_frame(&self) -> Option<VideoFrame> {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        Some(VideoFrame::new(
            sequence,
            RgbImage::new(self.dims.width, self.dims.height),
        ))
    }

    fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

/// Host that records every callback.
#[derive(Default)]
pub struct RecordingHost {
    emotions: Mutex<Vec<Emotion>>,
    running: AtomicUsize,
    streams: Mutex<Vec<String>>,
}

impl RecordingHost {
    pub fn emotions(&self) -> Vec<Emotion> {
        self.emotions.lock().unwrap().clone()
    }

    pub fn running_count(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    pub fn streams(&self) -> Vec<String> {
        self.streams.lock().unwrap().clone()
    }
}

impl HostCallbacks for RecordingHost {
    fn set_emotion(&self, emotion: Emotion) {
        self.emotions.lock().unwrap().push(emotion);
    }

    fn on_running(&self) {
        self.running.fetch_add(1, Ordering::SeqCst);
    }

    fn on_video_stream(&self, stream: &Arc<dyn CameraStream>) {
        self.streams.lock().unwrap().push(stream.id().to_string());
    }
}
