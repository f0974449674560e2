use std::io::Cursor;

use anyhow::Context;

use crate::foundation::core::RasterImage;
use crate::foundation::error::FlipResult;

/// Encode straight RGBA8 pixels as PNG.
pub fn encode_png(image: &RasterImage) -> FlipResult<Vec<u8>> {
    let mut buf = Vec::new();
    image
        .as_rgba_image()
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
