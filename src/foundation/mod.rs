/// Shared value types: dimensions, rasters, kurbo re-exports.
pub mod core;
/// Error taxonomy.
pub mod error;
