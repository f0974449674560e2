use crate::crop::engine::{CropRect, crop};
use crate::foundation::core::{Dimensions, RasterImage};
use crate::foundation::error::FlipResult;
use crate::overlay::transform::{GestureOutcome, GestureReport, OverlayTransform};

/// The single live overlay of an editing session.
///
/// `original` is the upload as decoded and is never modified; `working` is
/// what gets drawn (the original, or the latest crop of it). The transform's
/// scale is stored against `working` and applied once at composite time, so no
/// scaled copy of the pixels is ever kept. Dropping the slot discards both.
#[derive(Clone, Debug)]
pub struct OverlaySlot {
    original: RasterImage,
    working: RasterImage,
    transform: OverlayTransform,
}

impl OverlaySlot {
    pub fn upload(image: RasterImage) -> Self {
        Self {
            working: image.clone(),
            original: image,
            transform: OverlayTransform::identity(),
        }
    }

    pub fn original(&self) -> &RasterImage {
        &self.original
    }

    pub fn working(&self) -> &RasterImage {
        &self.working
    }

    pub fn transform(&self) -> &OverlayTransform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut OverlayTransform {
        &mut self.transform
    }

    /// Pixels to composite, at asset resolution.
    pub fn pixels(&self) -> &RasterImage {
        &self.working
    }

    pub fn apply_gesture(&mut self, report: &GestureReport) -> FlipResult<GestureOutcome> {
        self.transform.apply_gesture(report)
    }

    /// Crop the original upload. Earlier crops are discarded, so re-cropping
    /// never compounds; the previous working image survives a failed crop.
    pub fn crop(&mut self, displayed: Dimensions, rect: CropRect) -> FlipResult<&RasterImage> {
        let cropped = crop(&self.original, displayed, rect)?;
        self.working = cropped;
        Ok(&self.working)
    }

    pub fn reset_crop(&mut self) {
        self.working = self.original.clone();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/slot.rs"]
mod tests;
