use std::path::Path;

use anyhow::Context;

use crate::assets::loader::FsImageLoader;
use crate::capture::source::{FacingMode, StillFrameSource};
use crate::crop::engine::CropRect;
use crate::encode::sink::DownloadSink;
use crate::foundation::core::Dimensions;
use crate::foundation::error::{FlipError, FlipResult};
use crate::layout::thumbnails::ThumbnailSlot;
use crate::overlay::transform::{GestureOutcome, GestureReport};
use crate::render::compositor::{Compositor, ExportReceipt};
use crate::render::plan::{CompositorSettings, ExportVariant};
use crate::session::editor::{EditorSession, default_folders};

/// A whole editing session described as data, replayed without a UI.
///
/// Paths are relative to the directory the job is run from. `folders` is the
/// folder state at capture time (left strip); `folder_updates` are applied
/// afterwards and only show up in the live (right) strip.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportJob {
    pub frame: String,
    #[serde(default)]
    pub facing: FacingMode,
    #[serde(default)]
    pub preview: Option<Dimensions>,
    #[serde(default)]
    pub overlay: Option<OverlayJob>,
    #[serde(default = "default_folders")]
    pub folders: Vec<ThumbnailSlot>,
    #[serde(default)]
    pub folder_updates: Vec<ThumbnailSlot>,
    #[serde(default)]
    pub variant: ExportVariant,
    /// Falls back to [`CompositorSettings::from_env`] when omitted.
    #[serde(default = "CompositorSettings::from_env")]
    pub settings: CompositorSettings,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverlayJob {
    pub image: String,
    #[serde(default)]
    pub crop: Option<CropJob>,
    /// Gesture ends in the order they happened.
    #[serde(default)]
    pub gestures: Vec<GestureReport>,
    /// Rotation to lock in with an explicit save; no save when absent.
    #[serde(default)]
    pub save_rotation_deg: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CropJob {
    pub displayed: Dimensions,
    pub rect: CropRect,
}

impl ExportJob {
    pub fn from_json(text: &str) -> FlipResult<Self> {
        serde_json::from_str(text)
            .map_err(|err| FlipError::validation(format!("invalid export job: {err}")))
    }

    pub fn load(path: &Path) -> FlipResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            FlipError::input_unavailable(format!("read job '{}': {err}", path.display()))
        })?;
        Self::from_json(&text)
    }
}

/// Replay `job` through an [`EditorSession`] and deliver the export to `sink`.
pub fn run_job(
    job: &ExportJob,
    root: &Path,
    sink: &mut dyn DownloadSink,
) -> FlipResult<ExportReceipt> {
    let mut compositor = Compositor::new(job.settings.clone())?;
    let mut session = EditorSession::new(job.folders.clone());
    if job.facing != session.facing() {
        session.toggle_facing()?;
    }

    session.start_stream(Box::new(StillFrameSource::from_file(root.join(&job.frame))))?;
    session.capture()?;
    session.stop_stream()?;

    if let Some(preview) = job.preview {
        session.set_preview_size(preview)?;
    }

    if let Some(overlay) = &job.overlay {
        let path = root.join(&overlay.image);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read overlay '{}'", path.display()))
            .map_err(|err| FlipError::input_unavailable(format!("{err:#}")))?;
        session.upload_overlay_bytes(&bytes)?;
        if let Some(c) = overlay.crop {
            session.crop_overlay(c.displayed, c.rect)?;
        }
        for gesture in &overlay.gestures {
            if session.apply_gesture(gesture)? == GestureOutcome::RejectedLocked {
                tracing::warn!(?gesture, "gesture ignored on locked overlay");
            }
        }
        if let Some(rotation) = overlay.save_rotation_deg {
            session.save_overlay(rotation)?;
        }
    }

    for update in &job.folder_updates {
        session.set_folder_thumbnail(&update.folder_id, update.image_ref.clone())?;
    }

    let mut loader = FsImageLoader::new(root);
    session.export(&mut compositor, &mut loader, sink, job.variant)
}

#[cfg(test)]
#[path = "../../tests/unit/session/job.rs"]
mod tests;
