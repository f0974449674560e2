//! Mapping between preview space and source space.
//!
//! Preview space is an image as rendered inside a (possibly resized) container;
//! source space is the image's native pixel grid. Each axis carries its own
//! factor because container and image aspect ratios may differ. Rotation angles
//! are not part of this mapping and pass through untouched.

use crate::foundation::core::{Dimensions, Point, Rect, Size, Vec2};
use crate::foundation::error::FlipResult;

/// Per-axis `source / preview` ratio.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScaleFactor {
    pub sx: f64,
    pub sy: f64,
}

impl ScaleFactor {
    pub const IDENTITY: Self = Self { sx: 1.0, sy: 1.0 };

    pub fn to_source<T: Project>(self, value: T) -> T {
        value.scale_axes(self.sx, self.sy)
    }

    pub fn to_preview<T: Project>(self, value: T) -> T {
        value.scale_axes(1.0 / self.sx, 1.0 / self.sy)
    }

    pub fn is_uniform(self) -> bool {
        (self.sx - self.sy).abs() <= f64::EPSILON * self.sx.abs().max(self.sy.abs())
    }
}

/// Compute `(native.width / preview.width, native.height / preview.height)`.
pub fn scale_factors(native: Dimensions, preview: Dimensions) -> FlipResult<ScaleFactor> {
    preview.validate("preview")?;
    native.validate("native")?;

    Ok(ScaleFactor {
        sx: native.width / preview.width,
        sy: native.height / preview.height,
    })
}

/// Values whose coordinates and extents scale per axis.
pub trait Project: Sized {
    fn scale_axes(self, sx: f64, sy: f64) -> Self;
}

impl Project for Point {
    fn scale_axes(self, sx: f64, sy: f64) -> Self {
        Point::new(self.x * sx, self.y * sy)
    }
}

impl Project for Vec2 {
    fn scale_axes(self, sx: f64, sy: f64) -> Self {
        Vec2::new(self.x * sx, self.y * sy)
    }
}

impl Project for Size {
    fn scale_axes(self, sx: f64, sy: f64) -> Self {
        Size::new(self.width * sx, self.height * sy)
    }
}

impl Project for Rect {
    fn scale_axes(self, sx: f64, sy: f64) -> Self {
        Rect::new(self.x0 * sx, self.y0 * sy, self.x1 * sx, self.y1 * sy)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/projection.rs"]
mod tests;
