//! The user-placed overlay: its transform and its pixels.

/// The single live overlay: original upload and working crop.
pub mod slot;
/// Preview-space placement, locking and projection to source space.
pub mod transform;
