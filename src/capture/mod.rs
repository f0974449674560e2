/// Camera stream seam and frame capture.
pub mod source;
