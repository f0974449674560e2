use crate::foundation::core::{Point, RasterImage};
use crate::foundation::error::{FlipError, FlipResult};

/// Largest circle drawn in a sidebar strip.
pub const MAX_THUMBNAIL_DIAMETER: f64 = 80.0;
/// Vertical margin reserved before dividing the strip between slots.
const STRIP_MARGIN: f64 = 20.0;
/// Per-slot gap subtracted from the evenly divided height.
const SLOT_GAP: f64 = 10.0;

/// One named bucket. `image_ref` points into caller-owned storage and is
/// resolved through an [`crate::ImageLoader`] at render time.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ThumbnailSlot {
    pub folder_id: String,
    #[serde(default)]
    pub image_ref: Option<String>,
}

impl ThumbnailSlot {
    pub fn empty(folder_id: impl Into<String>) -> Self {
        Self {
            folder_id: folder_id.into(),
            image_ref: None,
        }
    }

    pub fn with_image(folder_id: impl Into<String>, image_ref: impl Into<String>) -> Self {
        Self {
            folder_id: folder_id.into(),
            image_ref: Some(image_ref.into()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StripSide {
    Left,
    Right,
}

impl StripSide {
    pub fn center_x(self, strip_width: f64, canvas_width: f64) -> f64 {
        match self {
            Self::Left => strip_width / 2.0,
            Self::Right => canvas_width - strip_width / 2.0,
        }
    }
}

/// Circle geometry for a vertical strip of `slot_count` slots.
///
/// Computed fresh per render. Every slot reserves its position whether or not
/// it has an image, so positions stay put as slots fill in.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SidebarLayout {
    pub container_diameter: f64,
    pub vertical_spacing: f64,
    pub slot_count: usize,
}

impl SidebarLayout {
    pub fn compute(
        slot_count: usize,
        available_height: f64,
        lower_bound: f64,
    ) -> FlipResult<Self> {
        if !(available_height.is_finite() && available_height > 0.0) {
            return Err(FlipError::invalid_geometry(format!(
                "sidebar height must be positive, got {available_height}"
            )));
        }
        if !(lower_bound.is_finite() && lower_bound > 0.0 && lower_bound <= MAX_THUMBNAIL_DIAMETER)
        {
            return Err(FlipError::invalid_geometry(format!(
                "thumbnail lower bound must lie in (0, {MAX_THUMBNAIL_DIAMETER}], got {lower_bound}"
            )));
        }

        if slot_count == 0 {
            return Ok(Self {
                container_diameter: MAX_THUMBNAIL_DIAMETER,
                vertical_spacing: available_height,
                slot_count,
            });
        }

        let n = slot_count as f64;
        let fitted = (available_height - STRIP_MARGIN) / n - SLOT_GAP;
        let container_diameter = fitted
            .min(MAX_THUMBNAIL_DIAMETER)
            .clamp(lower_bound, MAX_THUMBNAIL_DIAMETER);
        let vertical_spacing = (available_height - container_diameter * n) / (n + 1.0);
        if vertical_spacing < 0.0 {
            tracing::warn!(
                slot_count,
                available_height,
                container_diameter,
                "sidebar too short for its slots; thumbnails will overlap"
            );
        }

        Ok(Self {
            container_diameter,
            vertical_spacing,
            slot_count,
        })
    }

    pub fn center_y(&self, index: usize) -> f64 {
        let i = index as f64;
        self.vertical_spacing * (i + 1.0) + self.container_diameter * i
            + self.container_diameter / 2.0
    }

    pub fn centers(&self, side: StripSide, strip_width: f64, canvas_width: f64) -> Vec<Point> {
        let x = side.center_x(strip_width, canvas_width);
        (0..self.slot_count)
            .map(|i| Point::new(x, self.center_y(i)))
            .collect()
    }
}

/// A thumbnail ready to be drawn clipped to a circle.
#[derive(Clone, Debug, PartialEq)]
pub struct ThumbnailPlacement {
    pub slot_index: usize,
    pub folder_id: String,
    pub center: Point,
    pub diameter: f64,
    pub image: RasterImage,
}

/// Pair slots with their decoded images and positions. Slots without an image
/// (unset, or failed to decode) yield nothing but keep their position reserved.
pub fn place_thumbnails(
    slots: &[ThumbnailSlot],
    images: &[Option<RasterImage>],
    layout: &SidebarLayout,
    side: StripSide,
    strip_width: f64,
    canvas_width: f64,
) -> Vec<ThumbnailPlacement> {
    let x = side.center_x(strip_width, canvas_width);
    slots
        .iter()
        .enumerate()
        .take(layout.slot_count)
        .filter_map(|(i, slot)| {
            let image = images.get(i)?.as_ref()?;
            Some(ThumbnailPlacement {
                slot_index: i,
                folder_id: slot.folder_id.clone(),
                center: Point::new(x, layout.center_y(i)),
                diameter: layout.container_diameter,
                image: image.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/thumbnails.rs"]
mod tests;
