use crate::session::machine::{SessionEvent, SessionState};

/// Convenience result type used across flipframe.
pub type FlipResult<T> = Result<T, FlipError>;

/// Typed failures reported by the compositing engine and the editor session.
#[derive(thiserror::Error, Debug)]
pub enum FlipError {
    /// A camera stream or input file is absent or was denied.
    #[error("input unavailable: {0}")]
    InputUnavailable(String),

    /// Zero, negative or non-finite preview, source or layout dimensions.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A crop rectangle without a positive area.
    #[error("empty crop: {width}x{height}")]
    EmptyCrop { width: f64, height: f64 },

    /// A crop rectangle that, once mapped to native pixels, leaves the source image.
    #[error(
        "crop out of bounds: native rect ({x}, {y}, {width}x{height}) exceeds {image_width}x{image_height} image"
    )]
    OutOfBounds {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        image_width: u32,
        image_height: u32,
    },

    /// An image byte buffer could not be decoded.
    #[error("decode failure: {0}")]
    Decode(String),

    /// The editor session refused an event in its current state.
    #[error("invalid session transition: from {from:?} using event {event:?}")]
    InvalidTransition {
        from: SessionState,
        event: SessionEvent,
    },

    /// A structurally invalid request (no overlay, occupied slot, unknown folder).
    #[error("validation error: {0}")]
    Validation(String),

    /// Rasterizer limits or inconsistent pixel buffers.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlipError {
    /// Build a [`FlipError::InputUnavailable`] value.
    pub fn input_unavailable(msg: impl Into<String>) -> Self {
        Self::InputUnavailable(msg.into())
    }

    /// Build a [`FlipError::InvalidGeometry`] value.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Build a [`FlipError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`FlipError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FlipError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// True for every geometry rejection, including empty crops.
    pub fn is_invalid_geometry(&self) -> bool {
        matches!(self, Self::InvalidGeometry(_) | Self::EmptyCrop { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
