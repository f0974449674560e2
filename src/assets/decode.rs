use crate::foundation::core::RasterImage;
use crate::foundation::error::{FlipError, FlipResult};

/// Decode an encoded image (any format `image` recognises) into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> FlipResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|err| FlipError::decode(format!("decode image from memory: {err}")))?;
    let rgba = dyn_img.to_rgba8();
    RasterImage::new(rgba).map_err(|err| FlipError::decode(err.to_string()))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
