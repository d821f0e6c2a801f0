//! Coordinate transforms applied to detections before they reach the overlay.
//!
//! - [`mapping`]: scale a detection from the analyzed image to the surface size
//! - [`mirror`]: reflect a box across the vertical axis for a flipped video

pub mod mapping;
pub mod mirror;

pub use mapping::resize_detection;
pub use mirror::mirror_box;
