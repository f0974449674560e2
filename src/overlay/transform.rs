use crate::foundation::core::{Affine, Point, Size, Vec2};
use crate::foundation::error::{FlipError, FlipResult};
use crate::geometry::projection::ScaleFactor;

/// Placement of an overlay in preview space.
///
/// `scale` is always a single factor against the overlay's current asset
/// pixels. Gestures replace it and nothing multiplies it into the pixels, so
/// repeated edits never compound. Once `locked`, interactive gestures are
/// ignored.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayTransform {
    pub position: Point,
    pub scale: Vec2,
    pub rotation_deg: f64,
    locked: bool,
}

/// What an interactive transform tool reports when a gesture ends.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GestureReport {
    pub position: Point,
    pub scale_x: f64,
    pub scale_y: f64,
    #[serde(default)]
    pub rotation_deg: f64,
}

impl GestureReport {
    pub fn new(position: Point, scale_x: f64, scale_y: f64) -> Self {
        Self {
            position,
            scale_x,
            scale_y,
            rotation_deg: 0.0,
        }
    }

    pub fn with_rotation(mut self, rotation_deg: f64) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureOutcome {
    Applied,
    RejectedLocked,
}

/// Frozen copy of a transform taken on explicit save.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SavedTransform {
    pub position: Point,
    pub scale: Vec2,
    pub rotation_deg: f64,
}

impl Default for OverlayTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl OverlayTransform {
    pub const fn identity() -> Self {
        Self {
            position: Point::new(0.0, 0.0),
            scale: Vec2::new(1.0, 1.0),
            rotation_deg: 0.0,
            locked: false,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Record the end of an interactive manipulation.
    ///
    /// Reported scales are absolute factors against the asset pixels and replace
    /// the stored ones. A locked transform is left untouched.
    pub fn apply_gesture(&mut self, report: &GestureReport) -> FlipResult<GestureOutcome> {
        if self.locked {
            tracing::warn!("gesture ignored: overlay transform is saved");
            return Ok(GestureOutcome::RejectedLocked);
        }
        for (axis, v) in [("x", report.scale_x), ("y", report.scale_y)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(FlipError::invalid_geometry(format!(
                    "gesture scale {axis} must be positive and finite, got {v}"
                )));
            }
        }
        if !(report.position.is_finite() && report.rotation_deg.is_finite()) {
            return Err(FlipError::invalid_geometry(
                "gesture position and rotation must be finite",
            ));
        }

        self.position = report.position;
        self.scale = Vec2::new(report.scale_x, report.scale_y);
        self.rotation_deg = report.rotation_deg;
        Ok(GestureOutcome::Applied)
    }

    /// Freeze the transform with its final rotation. Saving an already locked
    /// transform returns the existing snapshot unchanged.
    pub fn save(&mut self, rotation_deg: f64) -> SavedTransform {
        if !self.locked {
            self.rotation_deg = rotation_deg;
            self.locked = true;
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> SavedTransform {
        SavedTransform {
            position: self.position,
            scale: self.scale,
            rotation_deg: self.rotation_deg,
        }
    }

    /// Reproject into source space for an asset of `asset_size` native pixels.
    pub fn project(&self, asset_size: Size, factors: ScaleFactor) -> OverlayPlacement {
        let preview_size = Size::new(
            asset_size.width * self.scale.x,
            asset_size.height * self.scale.y,
        );
        OverlayPlacement {
            origin: factors.to_source(self.position),
            size: factors.to_source(preview_size),
            rotation_deg: self.rotation_deg,
        }
    }
}

/// Overlay placement in output pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct OverlayPlacement {
    pub origin: Point,
    pub size: Size,
    pub rotation_deg: f64,
}

impl OverlayPlacement {
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            origin: self.origin + Vec2::new(dx, dy),
            ..self
        }
    }

    /// Map an `image_size` image onto this placement.
    ///
    /// Rotation pivots on the translated origin (the top-left corner of the
    /// overlay), which is where the interactive tool anchors it too.
    pub fn to_affine(&self, image_size: Size) -> Affine {
        let sx = if image_size.width > 0.0 {
            self.size.width / image_size.width
        } else {
            0.0
        };
        let sy = if image_size.height > 0.0 {
            self.size.height / image_size.height
        } else {
            0.0
        };
        Affine::translate(self.origin.to_vec2())
            * Affine::rotate(self.rotation_deg.to_radians())
            * Affine::scale_non_uniform(sx, sy)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/transform.rs"]
mod tests;
