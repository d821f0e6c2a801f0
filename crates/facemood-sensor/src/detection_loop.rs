//! Cooperative detection loop.
//!
//! Each iteration samples the video surface, runs single-face detection,
//! and for a detected face:
//!
//! 1. switches the loop to `Running` (and notifies the host) on the first face
//! 2. scales the box to the surface and mirrors it for the overlay
//! 3. feeds the expression scores to the emotion tracker, notifying the host
//!    on a confirmed change
//!
//! The next iteration starts [`RESCHEDULE_DELAY`] after the previous one
//! finished, so the effective rate is `1 / (inference + 50 ms)`. Iterations
//! never overlap.
//!
//! Shutdown is cooperative: the loop watches a liveness flag and stops
//! scheduling once it is cleared. An inference already in flight is allowed
//! to finish; its result is dropped before anything is mutated. Liveness is
//! checked again before each side effect of an iteration, so nothing reaches
//! the host or the overlay after the flag is cleared.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use facemood_models::{Emotion, EmotionState, LoopState};

use crate::camera::VideoSurface;
use crate::engine::FaceAnalysisEngine;
use crate::geometry::{mirror_box, resize_detection};
use crate::host::HostCallbacks;
use crate::metrics;
use crate::model_loader::ModelBundle;
use crate::overlay::{OverlayFrame, OverlaySink};
use crate::selector::EmotionTracker;

/// Delay between the end of one iteration and the start of the next.
pub const RESCHEDULE_DELAY: Duration = Duration::from_millis(50);

/// What one iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationOutcome {
    /// The surface had no frame to sample yet
    NoFrame,
    /// The engine found no face
    NoFace,
    /// The engine failed on this frame; treated like a missed frame
    EngineError,
    /// A face was processed; carries the newly confirmed emotion, if any
    Detected { changed: Option<Emotion> },
    /// The sensor was deactivated before the result was applied; result dropped
    Discarded,
}

/// Summary returned when the loop stops.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoopReport {
    /// Inference calls issued
    pub iterations: u64,
    /// Inference calls that found a face
    pub detections: u64,
    /// Last confirmed emotion
    pub emotion: Option<EmotionState>,
    /// Loop state at exit
    pub state: LoopState,
}

/// The detection loop of one sensor instance.
pub struct DetectionLoop {
    engine: Arc<dyn FaceAnalysisEngine>,
    _bundle: Arc<ModelBundle>,
    surface: VideoSurface,
    host: Arc<dyn HostCallbacks>,
    overlay: OverlaySink,
    liveness: watch::Receiver<bool>,
    tracker: EmotionTracker,
    state: LoopState,
    iterations: u64,
    detections: u64,
}

impl DetectionLoop {
    /// Create a loop over an attached surface.
    ///
    /// # Arguments
    /// * `bundle` - Loaded models; detection is invalid without them
    /// * `liveness` - Cleared (`false`) by the owner to stop the loop
    pub fn new(
        engine: Arc<dyn FaceAnalysisEngine>,
        bundle: Arc<ModelBundle>,
        surface: VideoSurface,
        host: Arc<dyn HostCallbacks>,
        overlay: OverlaySink,
        liveness: watch::Receiver<bool>,
    ) -> Self {
        Self {
            engine,
            _bundle: bundle,
            surface,
            host,
            overlay,
            liveness,
            tracker: EmotionTracker::new(),
            state: LoopState::Idle,
            iterations: 0,
            detections: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Last confirmed emotion.
    pub fn emotion(&self) -> Option<EmotionState> {
        self.tracker.current()
    }

    fn is_live(&self) -> bool {
        *self.liveness.borrow()
    }

    /// Run until the liveness flag is cleared.
    pub async fn run(mut self) -> LoopReport {
        info!(
            engine = self.engine.name(),
            stream = self.surface.stream_id(),
            "Starting face detection loop"
        );

        while self.is_live() {
            if self.iterate().await == IterationOutcome::Discarded {
                break;
            }
            if !self.reschedule().await {
                break;
            }
        }

        let report = self.report();
        info!(
            iterations = report.iterations,
            detections = report.detections,
            "Face detection loop stopped"
        );
        report
    }

    /// Wait out the reschedule delay.
    ///
    /// Returns `false` if the loop should stop instead of iterating again.
    async fn reschedule(&mut self) -> bool {
        if !self.is_live() {
            return false;
        }

        let cleared = tokio::select! {
            _ = tokio::time::sleep(RESCHEDULE_DELAY) => false,
            _ = self.liveness.wait_for(|live| !*live) => true,
        };

        !cleared && self.is_live()
    }

    /// Run a single iteration.
    pub async fn iterate(&mut self) -> IterationOutcome {
        let Some(frame) = self.surface.capture() else {
            debug!("No video frame available yet");
            return IterationOutcome::NoFrame;
        };

        self.iterations += 1;
        let started = Instant::now();
        let result = self.engine.detect_single_face(&frame).await;
        let latency = started.elapsed().as_secs_f64();

        if !self.is_live() {
            metrics::record_frame("discarded", latency);
            return discarded(frame.sequence);
        }

        let detection = match result {
            Ok(Some(detection)) => detection,
            Ok(None) => {
                debug!(frame = frame.sequence, "No face detected");
                metrics::record_frame("no_face", latency);
                return IterationOutcome::NoFace;
            }
            Err(e) => {
                warn!(frame = frame.sequence, "Face detection failed: {}", e);
                metrics::record_frame("error", latency);
                return IterationOutcome::EngineError;
            }
        };

        metrics::record_frame("face", latency);
        self.detections += 1;

        if self.state == LoopState::Idle {
            self.state = LoopState::Running;
            info!("First face detected, sensor running");
            self.host.on_running();
        }

        // Liveness can be cleared inside a host callback or from another
        // worker; recheck before each side effect.
        let detection = resize_detection(&detection, self.surface.dimensions());
        let mirrored = mirror_box(&detection.bbox, detection.image_dims.width as f64);
        if !self.is_live() || !self.overlay.publish(OverlayFrame::new(&detection, mirrored)) {
            return discarded(frame.sequence);
        }

        if !self.is_live() {
            return discarded(frame.sequence);
        }
        let changed = self.tracker.apply(&detection.expressions).map(|state| {
            info!(
                emotion = %state.emotion,
                confidence = state.confidence,
                "Emotion changed"
            );
            metrics::record_emotion_change(state.emotion);
            self.host.set_emotion(state.emotion);
            state.emotion
        });

        IterationOutcome::Detected { changed }
    }

    fn report(&self) -> LoopReport {
        LoopReport {
            iterations: self.iterations,
            detections: self.detections,
            emotion: self.tracker.current(),
            state: self.state,
        }
    }
}

fn discarded(sequence: u64) -> IterationOutcome {
    debug!(frame = sequence, "Discarding detection finished after deactivation");
    IterationOutcome::Discarded
}
