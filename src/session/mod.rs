//! Session-oriented editing API.

/// The editor session owning capture, overlay and folders.
pub mod editor;
/// JSON job descriptions replayed headlessly.
pub mod job;
/// Lifecycle states and allowed transitions.
pub mod machine;
