use std::path::PathBuf;

use crate::assets::decode::decode_image;
use crate::foundation::core::RasterImage;
use crate::foundation::error::{FlipError, FlipResult};

/// Which camera a stream is opened on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingMode {
    #[default]
    User,
    Environment,
}

impl FacingMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::User => Self::Environment,
            Self::Environment => Self::User,
        }
    }
}

/// Camera stream seam: anything that can be started, yield frames on demand,
/// and be stopped.
pub trait FrameSource {
    fn start(&mut self, facing: FacingMode) -> FlipResult<()>;
    fn grab_frame(&mut self) -> FlipResult<RasterImage>;
    fn stop(&mut self);
    fn is_streaming(&self) -> bool;
}

/// The original frame and its horizontally mirrored twin.
#[derive(Clone, Debug, PartialEq)]
pub struct CapturedFrame {
    pub original: RasterImage,
    pub mirrored: RasterImage,
}

impl CapturedFrame {
    pub fn from_original(original: RasterImage) -> Self {
        let mirrored = original.mirrored();
        Self { original, mirrored }
    }
}

pub fn capture_frame(source: &mut dyn FrameSource) -> FlipResult<CapturedFrame> {
    if !source.is_streaming() {
        return Err(FlipError::input_unavailable("camera stream is not running"));
    }
    let original = source.grab_frame()?;
    tracing::info!(
        width = original.width(),
        height = original.height(),
        "captured frame"
    );
    Ok(CapturedFrame::from_original(original))
}

/// Source that replays one still frame, optionally read lazily from disk.
#[derive(Debug)]
pub struct StillFrameSource {
    frame: StillFrame,
    facing: Option<FacingMode>,
}

#[derive(Debug)]
enum StillFrame {
    Decoded(RasterImage),
    File(PathBuf),
}

impl StillFrameSource {
    pub fn new(frame: RasterImage) -> Self {
        Self {
            frame: StillFrame::Decoded(frame),
            facing: None,
        }
    }

    /// Frame read and decoded from `path` when the stream starts.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            frame: StillFrame::File(path.into()),
            facing: None,
        }
    }

    pub fn facing(&self) -> Option<FacingMode> {
        self.facing
    }
}

impl FrameSource for StillFrameSource {
    fn start(&mut self, facing: FacingMode) -> FlipResult<()> {
        if let StillFrame::File(path) = &self.frame {
            let bytes = std::fs::read(path).map_err(|err| {
                FlipError::input_unavailable(format!("open frame '{}': {err}", path.display()))
            })?;
            self.frame = StillFrame::Decoded(decode_image(&bytes)?);
        }
        self.facing = Some(facing);
        Ok(())
    }

    fn grab_frame(&mut self) -> FlipResult<RasterImage> {
        match (&self.frame, self.facing) {
            (StillFrame::Decoded(img), Some(_)) => Ok(img.clone()),
            _ => Err(FlipError::input_unavailable("camera stream is not running")),
        }
    }

    fn stop(&mut self) {
        self.facing = None;
    }

    fn is_streaming(&self) -> bool {
        self.facing.is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/source.rs"]
mod tests;
