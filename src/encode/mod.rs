//! Export serialization and delivery.

/// Lossless PNG encoding.
pub mod png;
/// Download sink trait and built-in sinks.
pub mod sink;
