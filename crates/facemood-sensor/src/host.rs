//! Host notification contract.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use facemood_models::{Emotion, SensorEvent};

use crate::camera::CameraStream;

/// Callbacks a host application receives from the sensor.
///
/// Calls are made from the sensor's task and must not block.
pub trait HostCallbacks: Send + Sync {
    /// A new emotion was confirmed. Fires at most once per change.
    fn set_emotion(&self, emotion: Emotion);

    /// The first face was detected. Fires at most once per sensor instance.
    fn on_running(&self) {}

    /// The camera stream was acquired. Fires once, before models load.
    fn on_video_stream(&self, _stream: &Arc<dyn CameraStream>) {}
}

/// Host adapter that forwards callbacks as [`SensorEvent`]s over a channel.
#[derive(Debug, Clone)]
pub struct ChannelHost {
    tx: mpsc::UnboundedSender<SensorEvent>,
}

impl ChannelHost {
    /// Create the adapter and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SensorEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn emit(&self, event: SensorEvent) {
        if self.tx.send(event).is_err() {
            debug!("Host event receiver dropped, discarding event");
        }
    }
}

impl HostCallbacks for ChannelHost {
    fn set_emotion(&self, emotion: Emotion) {
        self.emit(SensorEvent::emotion(emotion));
    }

    fn on_running(&self) {
        self.emit(SensorEvent::running());
    }

    fn on_video_stream(&self, stream: &Arc<dyn CameraStream>) {
        self.emit(SensorEvent::video_stream(stream.info()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_host_forwards_events() {
        let (host, mut rx) = ChannelHost::new();

        host.on_running();
        host.set_emotion(Emotion::Sad);

        assert_eq!(rx.try_recv().unwrap().kind(), "running");
        match rx.try_recv().unwrap() {
            SensorEvent::Emotion { emotion, .. } => assert_eq!(emotion, Emotion::Sad),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (host, rx) = ChannelHost::new();
        drop(rx);
        host.set_emotion(Emotion::Happy);
    }
}
