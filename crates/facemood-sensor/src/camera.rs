//! Camera subsystem boundary and the video surface the loop samples.

use async_trait::async_trait;
use image::RgbImage;
use std::sync::Arc;

use facemood_models::{Dimensions, StreamInfo};

use crate::error::SensorResult;

/// One captured video frame.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Monotonic frame counter within the stream
    pub sequence: u64,
    /// RGB pixels
    pub image: Arc<RgbImage>,
}

impl VideoFrame {
    pub fn new(sequence: u64, image: RgbImage) -> Self {
        Self {
            sequence,
            image: Arc::new(image),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.image.width(), self.image.height())
    }
}

/// Camera subsystem: hands out live streams.
#[async_trait]
pub trait CameraSource: Send + Sync {
    /// Acquire a video stream.
    ///
    /// # Arguments
    /// * `requested` - Preferred capture size, if the host asked for one
    ///
    /// # Errors
    /// `SensorError::CameraUnavailable` when access is denied or no camera exists.
    async fn acquire(&self, requested: Option<Dimensions>) -> SensorResult<Arc<dyn CameraStream>>;
}

/// A live camera stream.
pub trait CameraStream: Send + Sync {
    /// Stream identifier.
    fn id(&self) -> &str;

    /// Capture dimensions in pixels.
    fn dimensions(&self) -> Dimensions;

    /// Latest frame, or `None` if the stream has not produced one yet.
    fn current_frame(&self) -> Option<VideoFrame>;

    /// Hand the stream back to the camera subsystem.
    ///
    /// May be called more than once; calls after the first do nothing.
    fn release(&self);

    fn info(&self) -> StreamInfo {
        StreamInfo {
            id: self.id().to_string(),
            dimensions: self.dimensions(),
        }
    }
}

/// Video surface a stream is attached to.
///
/// The detection loop samples frames here; the overlay is sized to it.
#[derive(Clone)]
pub struct VideoSurface {
    stream: Arc<dyn CameraStream>,
}

impl VideoSurface {
    /// Attach a stream to a new surface.
    pub fn attach(stream: Arc<dyn CameraStream>) -> Self {
        Self { stream }
    }

    /// Media dimensions of the attached stream.
    pub fn dimensions(&self) -> Dimensions {
        self.stream.dimensions()
    }

    /// Current frame of the attached stream.
    pub fn capture(&self) -> Option<VideoFrame> {
        self.stream.current_frame()
    }

    pub fn stream_id(&self) -> &str {
        self.stream.id()
    }
}

impl std::fmt::Debug for VideoSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoSurface")
            .field("stream", &self.stream.id())
            .field("dimensions", &self.stream.dimensions())
            .finish()
    }
}
