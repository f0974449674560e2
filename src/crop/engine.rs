use image::imageops;

use crate::foundation::core::{Dimensions, RasterImage, Rect};
use crate::foundation::error::{FlipError, FlipResult};
use crate::geometry::projection::scale_factors;

/// Slack allowed when checking the mapped rectangle against the image edge.
const BOUNDS_EPSILON: f64 = 1e-6;

/// User-drawn crop rectangle in displayed-image pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    fn output_size(self) -> FlipResult<(u32, u32)> {
        let empty = || FlipError::EmptyCrop {
            width: self.width,
            height: self.height,
        };
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(empty());
        }
        let w = self.width.round();
        let h = self.height.round();
        if w < 1.0 || h < 1.0 || w > f64::from(u32::MAX) || h > f64::from(u32::MAX) {
            return Err(empty());
        }
        Ok((w as u32, h as u32))
    }
}

/// Crop `image`, shown on screen at `displayed` size, to `rect` (displayed pixels).
///
/// The rectangle is mapped into native pixels per axis and sampled there; the
/// result is `rect.width x rect.height` pixels whatever the display scale. A
/// rectangle reaching outside the image is rejected, never clamped.
pub fn crop(image: &RasterImage, displayed: Dimensions, rect: CropRect) -> FlipResult<RasterImage> {
    let (out_w, out_h) = rect.output_size()?;
    if !(rect.x.is_finite() && rect.y.is_finite()) {
        return Err(FlipError::invalid_geometry("crop origin must be finite"));
    }
    let factors = scale_factors(image.dimensions(), displayed)?;
    let native = factors.to_source(rect.to_rect());

    let (img_w, img_h) = (f64::from(image.width()), f64::from(image.height()));
    if native.x0 < -BOUNDS_EPSILON
        || native.y0 < -BOUNDS_EPSILON
        || native.x1 > img_w + BOUNDS_EPSILON
        || native.y1 > img_h + BOUNDS_EPSILON
    {
        return Err(FlipError::OutOfBounds {
            x: native.x0,
            y: native.y0,
            width: native.width(),
            height: native.height(),
            image_width: image.width(),
            image_height: image.height(),
        });
    }

    let x0 = native.x0.round().clamp(0.0, img_w - 1.0) as u32;
    let y0 = native.y0.round().clamp(0.0, img_h - 1.0) as u32;
    let x1 = (native.x1.round() as u32).clamp(x0 + 1, image.width());
    let y1 = (native.y1.round() as u32).clamp(y0 + 1, image.height());

    let region = imageops::crop_imm(image.as_rgba_image(), x0, y0, x1 - x0, y1 - y0).to_image();
    let sampled = if region.dimensions() == (out_w, out_h) {
        region
    } else {
        imageops::resize(&region, out_w, out_h, imageops::FilterType::Triangle)
    };

    tracing::debug!(
        native_x = x0,
        native_y = y0,
        native_w = x1 - x0,
        native_h = y1 - y0,
        out_w,
        out_h,
        "cropped overlay"
    );
    RasterImage::new(sampled)
}

#[cfg(test)]
#[path = "../../tests/unit/crop/engine.rs"]
mod tests;
