//! Sensor lifecycle control.
//!
//! A [`LifecycleController`] owns one sensor instance: the camera stream,
//! the liveness flag and the detection loop task. States move forward only:
//!
//! ```text
//! MountedIdle -> ModelsLoading -> ModelsReady -> LoopRunning
//!      ^              |                               |
//!      +--(load err)--+          deactivate -> Unmounted
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;

use facemood_models::{LifecycleState, SensorOptions, SessionId};

use crate::camera::{CameraSource, CameraStream, VideoSurface};
use crate::detection_loop::{DetectionLoop, LoopReport};
use crate::error::{SensorError, SensorResult};
use crate::host::HostCallbacks;
use crate::layout::Layout;
use crate::logging::SessionLogger;
use crate::model_loader::ModelLoader;
use crate::overlay::OverlaySink;

/// Orchestrates camera acquisition, model loading and the detection loop.
pub struct LifecycleController {
    session_id: SessionId,
    logger: SessionLogger,
    camera: Arc<dyn CameraSource>,
    loader: Arc<ModelLoader>,
    host: Arc<dyn HostCallbacks>,
    options: SensorOptions,
    layout: Layout,
    overlay: OverlaySink,
    state: LifecycleState,
    stream: Option<Arc<dyn CameraStream>>,
    liveness: watch::Sender<bool>,
    loop_handle: Option<JoinHandle<LoopReport>>,
}

impl LifecycleController {
    /// Create a mounted, idle sensor.
    ///
    /// Pass the same `loader` to several controllers to load models once.
    pub fn new(
        camera: Arc<dyn CameraSource>,
        loader: Arc<ModelLoader>,
        host: Arc<dyn HostCallbacks>,
        options: SensorOptions,
    ) -> Self {
        let session_id = SessionId::new();
        let logger = SessionLogger::new(&session_id, loader.engine().name());
        let (liveness, _) = watch::channel(true);

        Self {
            session_id,
            logger,
            camera,
            loader,
            host,
            layout: Layout::resolve(&options),
            options,
            overlay: OverlaySink::new(),
            state: LifecycleState::MountedIdle,
            stream: None,
            liveness,
            loop_handle: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn options(&self) -> &SensorOptions {
        &self.options
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Overlay the detection loop publishes to.
    pub fn overlay(&self) -> &OverlaySink {
        &self.overlay
    }

    /// True while the detection loop task is alive.
    pub fn is_loop_running(&self) -> bool {
        self.loop_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Activate the sensor.
    ///
    /// Acquires the camera, notifies the host of the stream, loads the models
    /// if needed and starts the detection loop.
    ///
    /// # Errors
    /// - `CameraUnavailable`: nothing is left running
    /// - `ModelLoad`: the camera is released and the sensor returns to
    ///   `MountedIdle`
    /// - `AlreadyActive` / `Deactivated`: lifecycle misuse
    ///
    /// The returned future may be dropped while it waits on the camera or the
    /// models. The acquired stream is then released at once, and the next
    /// `activate` starts over from `MountedIdle`.
    pub async fn activate(&mut self) -> SensorResult<()> {
        if self.state == LifecycleState::ModelsLoading {
            self.logger
                .log_warning("Previous activation was cancelled during model loading");
            self.stream = None;
            self.transition(LifecycleState::MountedIdle)?;
        }

        match self.state {
            LifecycleState::Unmounted => return Err(SensorError::Deactivated),
            LifecycleState::MountedIdle if self.stream.is_none() => {}
            _ => return Err(SensorError::AlreadyActive),
        }
        self.options.validate()?;

        self.logger.log_progress("Requesting camera stream");
        let stream = match self.camera.acquire(self.options.webcam_size()).await {
            Ok(stream) => stream,
            Err(e) => {
                self.logger.log_error(&e.to_string());
                return Err(e);
            }
        };

        let pending = PendingStream::new(Arc::clone(&stream));
        let surface = VideoSurface::attach(Arc::clone(&stream));
        self.stream = Some(Arc::clone(&stream));
        self.host.on_video_stream(&stream);

        let bundle = match self.loader.bundle() {
            Some(bundle) => bundle,
            None => {
                self.transition(LifecycleState::ModelsLoading)?;
                match self.loader.load().await {
                    Ok(bundle) => bundle,
                    Err(e) => {
                        self.logger.log_error(&e.to_string());
                        pending.disarm();
                        self.release_stream();
                        self.transition(LifecycleState::MountedIdle)?;
                        return Err(e);
                    }
                }
            }
        };
        self.transition(LifecycleState::ModelsReady)?;

        let detection_loop = DetectionLoop::new(
            self.loader.engine(),
            bundle,
            surface,
            Arc::clone(&self.host),
            self.overlay.clone(),
            self.liveness.subscribe(),
        );
        let span = self.logger.create_span();
        self.loop_handle = Some(tokio::spawn(detection_loop.run().instrument(span)));
        pending.disarm();
        self.transition(LifecycleState::LoopRunning)?;

        Ok(())
    }

    /// Deactivate the sensor. Final; safe to call more than once.
    ///
    /// Stops the loop from scheduling further iterations and releases the
    /// camera. An inference in flight finishes in the background and its
    /// result is dropped.
    pub fn deactivate(&mut self) {
        if self.state.is_terminal() {
            return;
        }

        self.liveness.send_replace(false);
        self.release_stream();
        self.overlay.close();

        let from = self.state;
        self.state = LifecycleState::Unmounted;
        self.logger.log_transition(from, self.state);
    }

    /// Deactivate and wait for the loop task to finish.
    ///
    /// Returns the loop's report, or `None` if it never started.
    pub async fn shutdown(mut self) -> Option<LoopReport> {
        self.deactivate();
        let handle = self.loop_handle.take()?;

        match handle.await {
            Ok(report) => Some(report),
            Err(e) => {
                self.logger
                    .log_warning(&format!("Detection loop task failed: {}", e));
                None
            }
        }
    }

    fn release_stream(&mut self) {
        if let Some(stream) = self.stream.take() {
            self.logger.log_progress("Releasing camera stream");
            stream.release();
        }
    }

    fn transition(&mut self, next: LifecycleState) -> SensorResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(SensorError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        let from = self.state;
        self.state = next;
        self.logger.log_transition(from, next);
        Ok(())
    }
}

/// Releases a freshly acquired stream unless activation completes.
struct PendingStream {
    stream: Option<Arc<dyn CameraStream>>,
}

impl PendingStream {
    fn new(stream: Arc<dyn CameraStream>) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    fn disarm(mut self) {
        self.stream = None;
    }
}

impl Drop for PendingStream {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.release();
        }
    }
}

impl Drop for LifecycleController {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl std::fmt::Debug for LifecycleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleController")
            .field("session_id", &self.session_id)
            .field("state", &self.state)
            .field("loader", &self.loader)
            .field("loop_running", &self.is_loop_running())
            .finish()
    }
}
