//! Image decoding and thumbnail loading.

/// Byte buffer to [`crate::RasterImage`].
pub mod decode;
/// Image-ref loaders and the decode barrier.
pub mod loader;
