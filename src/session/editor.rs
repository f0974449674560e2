use crate::assets::decode::decode_image;
use crate::assets::loader::ImageLoader;
use crate::capture::source::{CapturedFrame, FacingMode, FrameSource, capture_frame};
use crate::crop::engine::CropRect;
use crate::encode::sink::DownloadSink;
use crate::foundation::core::{Dimensions, RasterImage};
use crate::foundation::error::{FlipError, FlipResult};
use crate::layout::thumbnails::ThumbnailSlot;
use crate::overlay::slot::OverlaySlot;
use crate::overlay::transform::{GestureOutcome, GestureReport, SavedTransform};
use crate::render::compositor::{Compositor, ExportReceipt};
use crate::render::plan::{ExportSnapshot, ExportVariant, OverlaySnapshot};
use crate::session::machine::{SessionEvent, SessionState, StateMachine};

/// Number of folder buckets a session starts with.
pub const DEFAULT_FOLDER_COUNT: usize = 6;

/// `Folder 1` .. `Folder 6`, all without a thumbnail.
pub fn default_folders() -> Vec<ThumbnailSlot> {
    (1..=DEFAULT_FOLDER_COUNT)
        .map(|i| ThumbnailSlot::empty(format!("Folder {i}")))
        .collect()
}

/// One capture-edit-export session.
///
/// Owns the camera stream, the captured frame pair, the single live overlay
/// and the folder thumbnails. Every mutation is checked against the session
/// state machine before anything changes, so a rejected call leaves the
/// session exactly as it was.
pub struct EditorSession {
    machine: StateMachine,
    source: Option<Box<dyn FrameSource>>,
    facing: FacingMode,
    frame: Option<CapturedFrame>,
    preview: Option<Dimensions>,
    overlay: Option<OverlaySlot>,
    folders: Vec<ThumbnailSlot>,
    frozen_folders: Vec<ThumbnailSlot>,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("state", &self.machine.state())
            .field("facing", &self.facing)
            .field("streaming", &self.is_streaming())
            .field("captured", &self.frame.is_some())
            .field("preview", &self.preview)
            .field("overlay", &self.overlay.is_some())
            .field("folders", &self.folders.len())
            .finish()
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(default_folders())
    }
}

impl EditorSession {
    pub fn new(folders: Vec<ThumbnailSlot>) -> Self {
        Self {
            machine: StateMachine::new(),
            source: None,
            facing: FacingMode::default(),
            frame: None,
            preview: None,
            overlay: None,
            folders,
            frozen_folders: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.machine.state()
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    pub fn is_streaming(&self) -> bool {
        self.source.as_ref().is_some_and(|s| s.is_streaming())
    }

    pub fn frame(&self) -> Option<&CapturedFrame> {
        self.frame.as_ref()
    }

    pub fn preview_size(&self) -> Option<Dimensions> {
        self.preview
    }

    pub fn overlay(&self) -> Option<&OverlaySlot> {
        self.overlay.as_ref()
    }

    /// Live folder state.
    pub fn folders(&self) -> &[ThumbnailSlot] {
        &self.folders
    }

    /// Folder state as it was at the last capture.
    pub fn frozen_folders(&self) -> &[ThumbnailSlot] {
        &self.frozen_folders
    }

    fn ensure(&self, event: SessionEvent) -> FlipResult<()> {
        if self.machine.can_transition(event) {
            return Ok(());
        }
        let from = self.machine.state();
        tracing::warn!(from = ?from, event = ?event, "session event rejected");
        Err(FlipError::InvalidTransition { from, event })
    }

    fn overlay_mut(&mut self) -> FlipResult<&mut OverlaySlot> {
        self.overlay
            .as_mut()
            .ok_or_else(|| FlipError::validation("no overlay uploaded"))
    }

    /// Open the camera. Allowed from any state but `Streaming`; a captured
    /// frame and overlay are kept, but editing and export wait for the next
    /// capture. A source that fails to start is dropped and the session stays
    /// where it was.
    pub fn start_stream(&mut self, mut source: Box<dyn FrameSource>) -> FlipResult<()> {
        self.ensure(SessionEvent::StartStream)?;
        source.start(self.facing)?;
        if let Some(mut previous) = self.source.replace(source) {
            previous.stop();
        }
        self.machine.transition(SessionEvent::StartStream)?;
        Ok(())
    }

    /// Release the camera. Only a session that is still `Streaming` changes
    /// state; after a capture the frame stays editable.
    pub fn stop_stream(&mut self) -> FlipResult<()> {
        if let Some(mut source) = self.source.take() {
            source.stop();
        }
        if self.machine.state() == SessionState::Streaming {
            self.machine.transition(SessionEvent::StopStream)?;
        }
        Ok(())
    }

    /// Switch cameras, restarting a running stream on the new facing mode.
    pub fn toggle_facing(&mut self) -> FlipResult<FacingMode> {
        self.facing = self.facing.toggled();
        if let Some(source) = self.source.as_mut().filter(|s| s.is_streaming()) {
            source.stop();
            if let Err(err) = source.start(self.facing) {
                self.stop_stream()?;
                return Err(err);
            }
        }
        Ok(self.facing)
    }

    /// Grab a frame and its mirror, freezing the folder thumbnails for the
    /// left sidebar.
    pub fn capture(&mut self) -> FlipResult<&CapturedFrame> {
        self.ensure(SessionEvent::Capture)?;
        let source = self
            .source
            .as_deref_mut()
            .ok_or_else(|| FlipError::input_unavailable("no camera stream"))?;
        let frame = capture_frame(source)?;
        self.machine.transition(SessionEvent::Capture)?;
        self.frozen_folders = self.folders.clone();
        Ok(self.frame.insert(frame))
    }

    /// Size the mirrored panel is currently displayed at.
    pub fn set_preview_size(&mut self, preview: Dimensions) -> FlipResult<()> {
        self.preview = Some(preview.validate("preview")?);
        Ok(())
    }

    /// Install a new overlay with an identity transform. Only one overlay is
    /// live at a time; clear the current one first.
    pub fn upload_overlay(&mut self, image: RasterImage) -> FlipResult<()> {
        self.ensure(SessionEvent::Edit)?;
        if self.overlay.is_some() {
            return Err(FlipError::validation(
                "an overlay is already live; clear it before uploading another",
            ));
        }
        self.overlay = Some(OverlaySlot::upload(image));
        self.machine.transition(SessionEvent::Edit)?;
        Ok(())
    }

    pub fn upload_overlay_bytes(&mut self, bytes: &[u8]) -> FlipResult<()> {
        self.ensure(SessionEvent::Edit)?;
        let image = decode_image(bytes)?;
        self.upload_overlay(image)
    }

    /// Report the end of an interactive gesture. A locked overlay rejects it
    /// without a state change.
    pub fn apply_gesture(&mut self, report: &GestureReport) -> FlipResult<GestureOutcome> {
        self.ensure(SessionEvent::Edit)?;
        let outcome = self.overlay_mut()?.apply_gesture(report)?;
        if outcome == GestureOutcome::Applied {
            self.machine.transition(SessionEvent::Edit)?;
        }
        Ok(outcome)
    }

    /// Crop the overlay from its original upload. The previous pixels stay
    /// in place when the crop is rejected.
    pub fn crop_overlay(&mut self, displayed: Dimensions, rect: CropRect) -> FlipResult<()> {
        self.ensure(SessionEvent::Edit)?;
        self.overlay_mut()?.crop(displayed, rect)?;
        self.machine.transition(SessionEvent::Edit)?;
        Ok(())
    }

    /// Freeze the overlay transform.
    pub fn save_overlay(&mut self, rotation_deg: f64) -> FlipResult<SavedTransform> {
        self.ensure(SessionEvent::Save)?;
        let saved = self.overlay_mut()?.transform_mut().save(rotation_deg);
        self.machine.transition(SessionEvent::Save)?;
        tracing::debug!(?saved, "overlay saved");
        Ok(saved)
    }

    /// Drop the overlay with its transform and pixels. Returns whether one was live.
    pub fn clear_overlay(&mut self) -> bool {
        self.overlay.take().is_some()
    }

    /// Point a folder's live thumbnail at `image_ref`, or clear it with `None`.
    pub fn set_folder_thumbnail(
        &mut self,
        folder_id: &str,
        image_ref: Option<String>,
    ) -> FlipResult<()> {
        let slot = self
            .folders
            .iter_mut()
            .find(|s| s.folder_id == folder_id)
            .ok_or_else(|| FlipError::validation(format!("unknown folder '{folder_id}'")))?;
        slot.image_ref = image_ref;
        Ok(())
    }

    /// Everything an export reads, taken in one step so later mutations
    /// cannot leak into an export in progress.
    pub fn snapshot_for_export(&self) -> FlipResult<ExportSnapshot> {
        let frame = self
            .frame
            .as_ref()
            .ok_or_else(|| FlipError::validation("nothing captured yet"))?;
        Ok(ExportSnapshot {
            original: frame.original.clone(),
            mirrored: frame.mirrored.clone(),
            preview: self.preview,
            overlay: self.overlay.as_ref().map(|slot| OverlaySnapshot {
                pixels: slot.pixels().clone(),
                transform: *slot.transform(),
            }),
            frozen_thumbnails: self.frozen_folders.clone(),
            live_thumbnails: self.folders.clone(),
        })
    }

    /// Compose and deliver an export. The session only moves to `Exported`
    /// once the sink has accepted the file.
    pub fn export(
        &mut self,
        compositor: &mut Compositor,
        loader: &mut dyn ImageLoader,
        sink: &mut dyn DownloadSink,
        variant: ExportVariant,
    ) -> FlipResult<ExportReceipt> {
        self.ensure(SessionEvent::Export)?;
        let snapshot = self.snapshot_for_export()?;
        let receipt = compositor.export(&snapshot, loader, sink, variant)?;
        self.machine.transition(SessionEvent::Export)?;
        tracing::info!(
            filename = %receipt.filename,
            width = receipt.width,
            height = receipt.height,
            "export delivered"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
