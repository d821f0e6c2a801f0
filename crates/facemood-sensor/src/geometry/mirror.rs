//! Horizontal mirroring of detection boxes.
//!
//! The video is presented flipped around its vertical axis, so boxes computed
//! on the camera-native frame must be reflected before drawing:
//!
//! ```text
//! x_mirrored = frame_width - x - width
//! y_mirrored = y
//! ```
//!
//! `frame_width` must be the width of the frame the box was computed on. A
//! different width still yields a box, just in the wrong place.

use facemood_models::{Corners, DetectionBox, MirroredBox, Point};

/// Reflect `bbox` across the vertical axis of a frame `frame_width` pixels wide.
///
/// Display and native fields are mirrored independently. Size, `area` and
/// `bottom` are unchanged.
pub fn mirror_box(bbox: &DetectionBox, frame_width: f64) -> MirroredBox {
    let x = frame_width - bbox.x - bbox.width;
    let y = bbox.y;

    let corners = Corners {
        top_left: Point::new(x, y),
        top_right: Point::new(x + bbox.width, y),
        bottom_left: Point::new(x, y + bbox.height),
        bottom_right: Point::new(x + bbox.width, y + bbox.height),
    };

    MirroredBox {
        x,
        y,
        width: bbox.width,
        height: bbox.height,
        corners,
        native_x: frame_width - bbox.native_x - bbox.native_width,
        native_y: bbox.native_y,
        native_width: bbox.native_width,
        native_height: bbox.native_height,
        area: bbox.area(),
        bottom: bbox.bottom(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_reference_box() {
        let bbox = DetectionBox::new(10.0, 20.0, 30.0, 40.0);
        let mirrored = mirror_box(&bbox, 100.0);

        assert_eq!(mirrored.x, 60.0);
        assert_eq!(mirrored.y, 20.0);
        assert_eq!(mirrored.width, 30.0);
        assert_eq!(mirrored.height, 40.0);
        assert_eq!(mirrored.corners.top_left, Point::new(60.0, 20.0));
        assert_eq!(mirrored.corners.top_right, Point::new(90.0, 20.0));
        assert_eq!(mirrored.corners.bottom_left, Point::new(60.0, 60.0));
        assert_eq!(mirrored.corners.bottom_right, Point::new(90.0, 60.0));
    }

    #[test]
    fn test_area_and_bottom_pass_through() {
        let bbox = DetectionBox::new(10.0, 20.0, 30.0, 40.0);
        let mirrored = mirror_box(&bbox, 100.0);

        assert_eq!(mirrored.area, 1200.0);
        assert_eq!(mirrored.bottom, 60.0);
    }

    #[test]
    fn test_native_fields_mirrored_independently() {
        let bbox = DetectionBox {
            native_x: 20.0,
            native_y: 40.0,
            native_width: 60.0,
            native_height: 80.0,
            ..DetectionBox::new(10.0, 20.0, 30.0, 40.0)
        };
        let mirrored = mirror_box(&bbox, 200.0);

        assert_eq!(mirrored.x, 160.0);
        assert_eq!(mirrored.native_x, 120.0);
        assert_eq!(mirrored.native_y, 40.0);
        assert_eq!(mirrored.native_width, 60.0);
        assert_eq!(mirrored.native_height, 80.0);
    }

    #[test]
    fn test_mirror_twice_is_identity() {
        let frame_width = 640.0;
        let boxes = [
            DetectionBox::new(0.0, 0.0, 640.0, 480.0),
            DetectionBox::new(0.0, 10.0, 50.0, 50.0),
            DetectionBox::new(590.0, 300.0, 50.0, 60.0),
            DetectionBox::new(123.5, 77.25, 201.0, 199.5),
            DetectionBox {
                native_x: 300.0,
                native_width: 100.0,
                ..DetectionBox::new(320.0, 240.0, 0.0, 0.0)
            },
        ];

        for bbox in boxes {
            let once = mirror_box(&bbox, frame_width);
            let twice = mirror_box(&once.to_box(), frame_width);
            assert_eq!(twice.to_box(), bbox, "round trip failed for {:?}", bbox);
        }
    }

    #[test]
    fn test_wrong_width_does_not_panic() {
        let bbox = DetectionBox::new(90.0, 0.0, 30.0, 30.0);
        let mirrored = mirror_box(&bbox, 100.0);
        assert_eq!(mirrored.x, -20.0);
    }
}
