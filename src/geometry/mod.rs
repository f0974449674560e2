//! Conversions between preview (on-screen) and source (native pixel) space.

pub mod projection;
