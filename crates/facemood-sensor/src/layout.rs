//! Presentation layout resolved from [`SensorOptions`].
//!
//! Layout only describes how the video and overlay are presented. It never
//! feeds back into the detection loop.

use serde::Serialize;

use facemood_models::SensorOptions;

/// Maximum container width on mobile, in viewport-height units.
pub const MOBILE_MAX_WIDTH_VH: u32 = 40;

/// How the video container is positioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Centering {
    /// No centering applied
    None,
    /// Centered horizontally
    Centered,
    /// Centered with a capped width
    CenteredCapped { max_width_vh: u32 },
}

/// Size of a presented surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SurfaceSize {
    /// Full container width, height follows aspect ratio
    Responsive,
    /// Fixed pixel size
    Fixed { width: u32, height: u32 },
}

/// Resolved presentation of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub centering: Centering,
    pub video: SurfaceSize,
    /// The overlay always matches the video size
    pub overlay: SurfaceSize,
    /// Video is flipped around its vertical axis
    pub mirror_video: bool,
}

impl Layout {
    /// Resolve the layout for a set of options.
    pub fn resolve(options: &SensorOptions) -> Self {
        let centering = if options.no_center {
            Centering::None
        } else if options.mobile {
            Centering::CenteredCapped {
                max_width_vh: MOBILE_MAX_WIDTH_VH,
            }
        } else {
            Centering::Centered
        };

        let size = match options.fixed_size() {
            Some(dims) => SurfaceSize::Fixed {
                width: dims.width,
                height: dims.height,
            },
            None => SurfaceSize::Responsive,
        };

        Self {
            centering,
            video: size,
            overlay: size,
            mirror_video: true,
        }
    }

}
