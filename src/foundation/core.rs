use crate::foundation::limits::{MAX_CANVAS_DIM, MIN_CANVAS_DIM};

pub use kurbo::{Affine, Point};

/// Default canvas size used when the caller does not pick one.
pub const DEFAULT_CANVAS_DIM: u32 = 400;

/// Output canvas dimensions in pixels.
///
/// Always within `[1, 4096]` on both axes; construction clamps instead of failing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Clamp integer dimensions into the supported range.
    pub fn clamped(width: u32, height: u32) -> Self {
        Self {
            width: width.clamp(MIN_CANVAS_DIM, MAX_CANVAS_DIM),
            height: height.clamp(MIN_CANVAS_DIM, MAX_CANVAS_DIM),
        }
    }

    /// Clamp script-provided (floating point) dimensions.
    ///
    /// Fractions truncate; NaN and negative values become the minimum.
    pub fn from_script(width: f64, height: f64) -> Self {
        fn dim(v: f64) -> u32 {
            if v.is_nan() {
                return MIN_CANVAS_DIM;
            }
            let v = v.trunc().clamp(f64::from(MIN_CANVAS_DIM), f64::from(MAX_CANVAS_DIM));
            v as u32
        }

        Self {
            width: dim(width),
            height: dim(height),
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_DIM,
            height: DEFAULT_CANVAS_DIM,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
