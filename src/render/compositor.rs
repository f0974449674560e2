use crate::assets::loader::{ImageLoader, resolve_thumbnails};
use crate::encode::png::encode_png;
use crate::encode::sink::DownloadSink;
use crate::foundation::core::RasterImage;
use crate::foundation::error::FlipResult;
use crate::render::cpu::CpuRasterizer;
use crate::render::plan::{CompositorSettings, ExportSnapshot, ExportVariant, plan_export};

/// What an export handed to its sink.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ExportReceipt {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub byte_len: usize,
}

/// Turns an [`ExportSnapshot`] into a finished raster.
#[derive(Debug)]
pub struct Compositor {
    settings: CompositorSettings,
    rasterizer: CpuRasterizer,
}

impl Compositor {
    pub fn new(settings: CompositorSettings) -> FlipResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            rasterizer: CpuRasterizer::new(),
        })
    }

    pub fn settings(&self) -> &CompositorSettings {
        &self.settings
    }

    /// Decode every thumbnail the variant needs, then lay out and rasterize.
    ///
    /// Thumbnails that fail to load are left out; their slots keep their
    /// position in the strip.
    #[tracing::instrument(skip(self, snapshot, loader))]
    pub fn compose(
        &mut self,
        snapshot: &ExportSnapshot,
        loader: &mut dyn ImageLoader,
        variant: ExportVariant,
    ) -> FlipResult<RasterImage> {
        let (left, right) = match variant {
            ExportVariant::WithSidebars => (
                resolve_thumbnails(&snapshot.frozen_thumbnails, loader)?,
                resolve_thumbnails(&snapshot.live_thumbnails, loader)?,
            ),
            ExportVariant::Combined => (Vec::new(), Vec::new()),
        };

        let plan = plan_export(snapshot, &left, &right, &self.settings, variant)?;
        tracing::debug!(
            width = plan.canvas.width,
            height = plan.canvas.height,
            ops = plan.ops.len(),
            "export planned"
        );
        self.rasterizer.render(&plan)
    }

    /// Compose, encode as PNG and deliver under the variant's download name.
    pub fn export(
        &mut self,
        snapshot: &ExportSnapshot,
        loader: &mut dyn ImageLoader,
        sink: &mut dyn DownloadSink,
        variant: ExportVariant,
    ) -> FlipResult<ExportReceipt> {
        let image = self.compose(snapshot, loader, variant)?;
        let bytes = encode_png(&image)?;
        let filename = variant.filename();
        sink.deliver(filename, &bytes)?;
        Ok(ExportReceipt {
            filename: filename.to_string(),
            width: image.width(),
            height: image.height(),
            byte_len: bytes.len(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
