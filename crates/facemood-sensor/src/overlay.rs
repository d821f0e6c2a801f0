//! Detection overlay.
//!
//! The loop publishes one [`OverlayFrame`] per detection: the mirrored face
//! box plus the expression labels worth drawing. The rendering layer reads
//! the latest frame through [`OverlaySink::subscribe`]; the loop is the only
//! writer. Once the sink is closed it stays empty.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use tokio::sync::watch;

use facemood_models::{DetectionFrame, Dimensions, Emotion, MirroredBox};

/// Labels below this confidence are not drawn.
pub const MIN_LABEL_CONFIDENCE: f64 = 0.05;

const BOX_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);
const BAR_COLOR: Rgba<u8> = Rgba([0, 160, 255, 220]);
const BAR_HEIGHT: u32 = 6;
const BAR_GAP: u32 = 2;

/// What the overlay shows for one detection.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame {
    /// Face box in mirrored surface coordinates
    pub mirrored: MirroredBox,
    /// Detection score
    pub score: f64,
    /// Labels at or above [`MIN_LABEL_CONFIDENCE`], most confident first
    pub labels: Vec<(Emotion, f64)>,
    /// Surface the box is expressed in
    pub surface: Dimensions,
}

impl OverlayFrame {
    /// Build an overlay frame from a surface-space detection and its mirrored box.
    pub fn new(detection: &DetectionFrame, mirrored: MirroredBox) -> Self {
        let mut labels: Vec<(Emotion, f64)> = detection
            .expressions
            .iter()
            .filter(|(_, confidence)| *confidence >= MIN_LABEL_CONFIDENCE)
            .collect();
        labels.sort_by(|a, b| b.1.total_cmp(&a.1));

        Self {
            mirrored,
            score: detection.score,
            labels,
            surface: detection.image_dims,
        }
    }
}

/// Single-writer holder of the latest overlay frame.
#[derive(Debug, Clone)]
pub struct OverlaySink {
    tx: Arc<watch::Sender<Option<OverlayFrame>>>,
    closed: Arc<AtomicBool>,
}

impl Default for OverlaySink {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlaySink {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            tx: Arc::new(tx),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the displayed frame.
    ///
    /// Returns `false` without publishing once the sink is closed.
    pub fn publish(&self, frame: OverlayFrame) -> bool {
        // Checked under the channel's write lock so a concurrent close wins.
        self.tx.send_if_modified(|slot| {
            if self.closed.load(Ordering::SeqCst) {
                return false;
            }
            *slot = Some(frame);
            true
        })
    }

    /// Remove the displayed frame and reject every later publish.
    pub fn close(&self) {
        self.tx.send_modify(|slot| {
            self.closed.store(true, Ordering::SeqCst);
            *slot = None;
        });
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Latest published frame.
    pub fn latest(&self) -> Option<OverlayFrame> {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every publish.
    pub fn subscribe(&self) -> watch::Receiver<Option<OverlayFrame>> {
        self.tx.subscribe()
    }
}

/// Rasterize an overlay frame onto a transparent canvas of its surface size.
///
/// Draws the face outline and one confidence bar per label below it.
pub fn render_overlay(frame: &OverlayFrame) -> RgbaImage {
    let mut canvas = RgbaImage::new(frame.surface.width, frame.surface.height);
    if frame.surface.is_empty() {
        return canvas;
    }

    let bbox = &frame.mirrored;
    let width = bbox.width.round().max(1.0) as u32;
    let height = bbox.height.round().max(1.0) as u32;
    let left = bbox.x.round() as i32;
    let top = bbox.y.round() as i32;

    draw_hollow_rect_mut(&mut canvas, Rect::at(left, top).of_size(width, height), BOX_COLOR);

    let mut bar_top = top + height as i32 + BAR_GAP as i32;
    for (_, confidence) in &frame.labels {
        let bar_width = (width as f64 * confidence.clamp(0.0, 1.0)).round().max(1.0) as u32;
        draw_filled_rect_mut(
            &mut canvas,
            Rect::at(left, bar_top).of_size(bar_width, BAR_HEIGHT),
            BAR_COLOR,
        );
        bar_top += (BAR_HEIGHT + BAR_GAP) as i32;
    }

    canvas
}
