//! Flipframe captures a camera frame, pairs it with its mirror image, lets a
//! user place an overlay on the mirrored half, and exports the composite at
//! native resolution.
//!
//! The overlay is positioned in preview space (the size the mirrored panel is
//! displayed at) and projected into source pixels on export, so what the user
//! saw is what lands in the file. The public API is session-oriented:
//!
//! - Drive an [`EditorSession`] through stream, capture, edit, save and export
//! - Hand exports to a [`DownloadSink`]
//! - Or describe the whole session as an [`ExportJob`] and [`run_job`] it
#![forbid(unsafe_code)]

pub mod assets;
pub mod capture;
pub mod crop;
pub mod encode;
pub mod foundation;
pub mod geometry;
pub mod layout;
pub mod overlay;
pub mod render;
pub mod session;

pub use crate::foundation::core::{
    Affine, Canvas, Dimensions, Point, RasterImage, Rect, Size, Vec2,
};
pub use crate::foundation::error::{FlipError, FlipResult};

pub use crate::assets::decode::decode_image;
pub use crate::assets::loader::{
    DecodeGate, FsImageLoader, ImageLoader, MemoryImageLoader, resolve_thumbnails,
};
pub use crate::capture::source::{CapturedFrame, FacingMode, FrameSource, StillFrameSource};
pub use crate::crop::engine::{CropRect, crop};
pub use crate::encode::png::encode_png;
pub use crate::encode::sink::{DirectorySink, DownloadSink, InMemorySink};
pub use crate::geometry::projection::{Project, ScaleFactor, scale_factors};
pub use crate::layout::thumbnails::{SidebarLayout, StripSide, ThumbnailSlot};
pub use crate::overlay::transform::{
    GestureOutcome, GestureReport, OverlayPlacement, OverlayTransform, SavedTransform,
};
pub use crate::render::compositor::{Compositor, ExportReceipt};
pub use crate::render::plan::{CompositorSettings, ExportSnapshot, ExportVariant};
pub use crate::session::editor::{EditorSession, default_folders};
pub use crate::session::job::{ExportJob, run_job};
pub use crate::session::machine::{SessionEvent, SessionState};
