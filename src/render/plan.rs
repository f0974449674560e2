use crate::foundation::core::{Affine, Canvas, Dimensions, Point, RasterImage, Rect, Vec2};
use crate::foundation::error::{FlipError, FlipResult};
use crate::geometry::projection::scale_factors;
use crate::layout::thumbnails::{
    MAX_THUMBNAIL_DIAMETER, SidebarLayout, StripSide, ThumbnailSlot, place_thumbnails,
};
use crate::overlay::transform::{OverlayPlacement, OverlayTransform};

/// Download name of the two-panel export.
pub const COMBINED_FILENAME: &str = "combined_image.png";
/// Download name of the export with thumbnail sidebars.
pub const FINAL_FILENAME: &str = "final_image.png";

/// Compositor tuning. Every field has a default, so partial JSON is accepted.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositorSettings {
    /// Width of each thumbnail strip in output pixels.
    pub sidebar_width: u32,
    /// Smallest circle diameter a strip shrinks its thumbnails to.
    pub thumbnail_min_diameter: f64,
    /// Straight RGBA fill behind the thumbnail strips.
    pub sidebar_rgba: [u8; 4],
    /// Straight RGBA fill of the whole canvas before anything is drawn.
    pub background_rgba: [u8; 4],
}

impl Default for CompositorSettings {
    fn default() -> Self {
        Self {
            sidebar_width: 64,
            thumbnail_min_diameter: 30.0,
            sidebar_rgba: [31, 41, 55, 255],
            background_rgba: [0, 0, 0, 255],
        }
    }
}

impl CompositorSettings {
    /// Defaults with `FLIPFRAME_SIDEBAR_WIDTH` / `FLIPFRAME_THUMB_MIN_DIAMETER`
    /// applied when they parse.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Some(width) = std::env::var("FLIPFRAME_SIDEBAR_WIDTH")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
        {
            settings.sidebar_width = width;
        }
        if let Some(d) = std::env::var("FLIPFRAME_THUMB_MIN_DIAMETER")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|d| d.is_finite())
        {
            settings.thumbnail_min_diameter = d;
        }
        settings
    }

    pub fn validate(&self) -> FlipResult<()> {
        if !(20.0..=MAX_THUMBNAIL_DIAMETER).contains(&self.thumbnail_min_diameter) {
            return Err(FlipError::invalid_geometry(format!(
                "thumbnail_min_diameter must lie in 20..={MAX_THUMBNAIL_DIAMETER}, got {}",
                self.thumbnail_min_diameter
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportVariant {
    /// Original and mirrored panels with the overlay, no sidebars.
    Combined,
    /// Full layout: left strip, original, mirrored + overlay, right strip.
    #[default]
    WithSidebars,
}

impl ExportVariant {
    pub fn filename(self) -> &'static str {
        match self {
            Self::Combined => COMBINED_FILENAME,
            Self::WithSidebars => FINAL_FILENAME,
        }
    }

    fn has_sidebars(self) -> bool {
        matches!(self, Self::WithSidebars)
    }
}

/// Overlay pixels together with the transform they are drawn under.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlaySnapshot {
    pub pixels: RasterImage,
    pub transform: OverlayTransform,
}

/// Every input an export reads, captured at once before any decode starts.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportSnapshot {
    pub original: RasterImage,
    pub mirrored: RasterImage,
    /// Size the mirrored panel was shown at while the overlay was placed.
    pub preview: Option<Dimensions>,
    pub overlay: Option<OverlaySnapshot>,
    /// Folder state frozen at capture time (left strip).
    pub frozen_thumbnails: Vec<ThumbnailSlot>,
    /// Current folder state (right strip).
    pub live_thumbnails: Vec<ThumbnailSlot>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        rgba: [u8; 4],
    },
    /// Image drawn at native size under `transform`.
    Image {
        image: RasterImage,
        transform: Affine,
    },
    /// Image scaled to cover a circle and clipped to it.
    CircleImage {
        image: RasterImage,
        center: Point,
        diameter: f64,
    },
}

/// Ordered draw list for one export, in output pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportPlan {
    pub canvas: Canvas,
    pub ops: Vec<DrawOp>,
    /// Where the overlay lands, for inspection.
    pub overlay: Option<OverlayPlacement>,
}

/// Lay out an export. `left` and `right` hold decoded thumbnails indexed like
/// the frozen and live slot lists; they are ignored for [`ExportVariant::Combined`].
pub fn plan_export(
    snapshot: &ExportSnapshot,
    left: &[Option<RasterImage>],
    right: &[Option<RasterImage>],
    settings: &CompositorSettings,
    variant: ExportVariant,
) -> FlipResult<ExportPlan> {
    let (src_w, src_h) = (snapshot.original.width(), snapshot.original.height());
    if (snapshot.mirrored.width(), snapshot.mirrored.height()) != (src_w, src_h) {
        return Err(FlipError::invalid_geometry(format!(
            "mirrored panel is {}x{} but original is {src_w}x{src_h}",
            snapshot.mirrored.width(),
            snapshot.mirrored.height()
        )));
    }

    let sidebar = if variant.has_sidebars() {
        settings.sidebar_width
    } else {
        0
    };
    let canvas_w = src_w
        .checked_mul(2)
        .and_then(|w| w.checked_add(sidebar.checked_mul(2)?))
        .ok_or_else(|| FlipError::invalid_geometry("export canvas width overflows u32"))?;
    let canvas = Canvas {
        width: canvas_w,
        height: src_h,
    };
    let (side_w, panel_w, canvas_wf, canvas_hf) = (
        f64::from(sidebar),
        f64::from(src_w),
        f64::from(canvas_w),
        f64::from(src_h),
    );

    let mut ops = vec![DrawOp::FillRect {
        rect: Rect::new(0.0, 0.0, canvas_wf, canvas_hf),
        rgba: settings.background_rgba,
    }];
    if sidebar > 0 {
        ops.push(DrawOp::FillRect {
            rect: Rect::new(0.0, 0.0, side_w, canvas_hf),
            rgba: settings.sidebar_rgba,
        });
        ops.push(DrawOp::FillRect {
            rect: Rect::new(canvas_wf - side_w, 0.0, canvas_wf, canvas_hf),
            rgba: settings.sidebar_rgba,
        });
    }

    // Both panels at native resolution, original first.
    ops.push(DrawOp::Image {
        image: snapshot.original.clone(),
        transform: Affine::translate(Vec2::new(side_w, 0.0)),
    });
    let mirrored_x = side_w + panel_w;
    ops.push(DrawOp::Image {
        image: snapshot.mirrored.clone(),
        transform: Affine::translate(Vec2::new(mirrored_x, 0.0)),
    });

    let mut overlay_placement = None;
    if let Some(overlay) = &snapshot.overlay {
        let preview = snapshot.preview.ok_or_else(|| {
            FlipError::invalid_geometry("preview size unknown; cannot place overlay")
        })?;
        let factors = scale_factors(snapshot.mirrored.dimensions(), preview)?;
        let placement = overlay
            .transform
            .project(overlay.pixels.size(), factors)
            .offset(mirrored_x, 0.0);
        ops.push(DrawOp::Image {
            image: overlay.pixels.clone(),
            transform: placement.to_affine(overlay.pixels.size()),
        });
        overlay_placement = Some(placement);
    }

    if variant.has_sidebars() && sidebar > 0 {
        let slot_count = snapshot
            .frozen_thumbnails
            .len()
            .max(snapshot.live_thumbnails.len());
        let layout =
            SidebarLayout::compute(slot_count, canvas_hf, settings.thumbnail_min_diameter)?;
        let strips = [
            (StripSide::Left, &snapshot.frozen_thumbnails, left),
            (StripSide::Right, &snapshot.live_thumbnails, right),
        ];
        for (side, slots, images) in strips {
            for placed in place_thumbnails(slots, images, &layout, side, side_w, canvas_wf) {
                ops.push(DrawOp::CircleImage {
                    image: placed.image,
                    center: placed.center,
                    diameter: placed.diameter,
                });
            }
        }
    }

    Ok(ExportPlan {
        canvas,
        ops,
        overlay: overlay_placement,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
