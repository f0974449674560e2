use std::sync::Arc;

use crate::foundation::error::{FlipError, FlipResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Width/height pair in pixels, used for preview containers and source images alike.
///
/// Values from different spaces are never mixed directly; go through
/// [`crate::scale_factors`] to convert.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_positive(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Reject zero, negative or non-finite dimensions. `what` names the value in the error.
    pub fn validate(self, what: &str) -> FlipResult<Self> {
        if !self.is_positive() {
            return Err(FlipError::invalid_geometry(format!(
                "{what} dimensions must be positive and finite, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(self)
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl From<Size> for Dimensions {
    fn from(value: Size) -> Self {
        Self::new(value.width, value.height)
    }
}

/// Integer output surface size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// Immutable decoded raster: straight-alpha RGBA8, row-major, tightly packed.
///
/// Cloning shares the pixel buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    pixels: Arc<image::RgbaImage>,
}

impl RasterImage {
    pub fn new(pixels: image::RgbaImage) -> FlipResult<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(FlipError::invalid_geometry(format!(
                "raster image must be non-empty, got {}x{}",
                pixels.width(),
                pixels.height()
            )));
        }
        Ok(Self {
            pixels: Arc::new(pixels),
        })
    }

    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> FlipResult<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba8.len() != expected {
            return Err(FlipError::render(format!(
                "rgba8 buffer length {} does not match {width}x{height}",
                rgba8.len()
            )));
        }
        let pixels = image::RgbaImage::from_raw(width, height, rgba8)
            .ok_or_else(|| FlipError::render("rgba8 buffer rejected by image"))?;
        Self::new(pixels)
    }

    /// Single-colour image; mostly useful for fixtures and placeholders.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> FlipResult<Self> {
        Self::new(image::RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(f64::from(self.width()), f64::from(self.height()))
    }

    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width()), f64::from(self.height()))
    }

    pub fn as_rgba_image(&self) -> &image::RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.pixels.get_pixel(x, y).0)
    }

    /// Horizontally mirrored copy (the "flipped" twin of a capture).
    pub fn mirrored(&self) -> Self {
        Self {
            pixels: Arc::new(image::imageops::flip_horizontal(self.pixels.as_ref())),
        }
    }

    /// True when both handles point at the same pixel buffer.
    pub fn shares_pixels_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
