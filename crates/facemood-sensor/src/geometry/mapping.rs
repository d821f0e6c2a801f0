//! Dimension matching between the analyzed image and the video surface.
//!
//! The engine may analyze a frame at a different size than the surface the
//! overlay is drawn over. Detections are scaled into surface space before
//! mirroring, so the mirror always sees the width its box was expressed in.

use facemood_models::{DetectionFrame, Dimensions};

/// Scale a detection from its `image_dims` to `target`.
///
/// Returns the detection unchanged when either size is empty.
pub fn resize_detection(detection: &DetectionFrame, target: Dimensions) -> DetectionFrame {
    let source = detection.image_dims;
    if source.is_empty() || target.is_empty() || source == target {
        return detection.clone();
    }

    let sx = target.width as f64 / source.width as f64;
    let sy = target.height as f64 / source.height as f64;

    DetectionFrame {
        bbox: detection.bbox.scale(sx, sy),
        image_dims: target,
        score: detection.score,
        expressions: detection.expressions.clone(),
    }
}
