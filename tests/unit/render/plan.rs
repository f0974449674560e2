use super::*;
use crate::foundation::core::Size;
use crate::overlay::transform::GestureReport;

fn snapshot(w: u32, h: u32) -> ExportSnapshot {
    let original = RasterImage::solid(w, h, [200, 10, 10, 255]).unwrap();
    ExportSnapshot {
        mirrored: original.mirrored(),
        original,
        preview: None,
        overlay: None,
        frozen_thumbnails: Vec::new(),
        live_thumbnails: Vec::new(),
    }
}

fn overlay_at(position: Point, scale: f64, w: u32, h: u32) -> OverlaySnapshot {
    let mut transform = OverlayTransform::identity();
    transform
        .apply_gesture(&GestureReport::new(position, scale, scale))
        .unwrap();
    OverlaySnapshot {
        pixels: RasterImage::solid(w, h, [0, 255, 0, 255]).unwrap(),
        transform,
    }
}

fn image_translations(plan: &ExportPlan) -> Vec<Vec2> {
    plan.ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Image { transform, .. } => Some(transform.translation()),
            _ => None,
        })
        .collect()
}

#[test]
fn sidebar_canvas_is_two_panels_plus_two_strips() {
    let snap = snapshot(100, 50);
    let settings = CompositorSettings::default();
    let plan = plan_export(&snap, &[], &[], &settings, ExportVariant::WithSidebars).unwrap();
    assert_eq!(plan.canvas, Canvas { width: 2 * 100 + 2 * 64, height: 50 });
    assert_eq!(
        image_translations(&plan),
        vec![Vec2::new(64.0, 0.0), Vec2::new(164.0, 0.0)]
    );
    assert!(plan.overlay.is_none());
}

#[test]
fn combined_variant_has_no_strips() {
    let snap = snapshot(100, 50);
    let plan = plan_export(
        &snap,
        &[],
        &[],
        &CompositorSettings::default(),
        ExportVariant::Combined,
    )
    .unwrap();
    assert_eq!(plan.canvas, Canvas { width: 200, height: 50 });
    assert_eq!(
        image_translations(&plan),
        vec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)]
    );
    assert_eq!(ExportVariant::Combined.filename(), "combined_image.png");
    assert_eq!(ExportVariant::WithSidebars.filename(), "final_image.png");
}

#[test]
fn quarter_scale_overlay_lands_in_mirrored_panel() {
    let mut snap = snapshot(1920, 1080);
    snap.preview = Some(Dimensions::new(480.0, 270.0));
    snap.overlay = Some(overlay_at(Point::new(100.0, 50.0), 2.0, 30, 20));
    let settings = CompositorSettings::default();
    let sidebar = f64::from(settings.sidebar_width);

    let plan = plan_export(&snap, &[], &[], &settings, ExportVariant::WithSidebars).unwrap();
    let placement = plan.overlay.unwrap();
    assert_eq!(placement.origin, Point::new(1920.0 + sidebar + 400.0, 200.0));
    assert_eq!(placement.size, Size::new(30.0 * 2.0 * 4.0, 20.0 * 2.0 * 4.0));

    // The overlay is drawn after both panels.
    let last_image = plan
        .ops
        .iter()
        .rev()
        .find_map(|op| match op {
            DrawOp::Image { transform, image } => Some((*transform, image.clone())),
            _ => None,
        })
        .unwrap();
    assert_eq!((last_image.1.width(), last_image.1.height()), (30, 20));
    let far_corner = last_image.0 * Point::new(30.0, 20.0);
    assert!((far_corner.x - (1920.0 + sidebar + 400.0 + 240.0)).abs() < 1e-9);
    assert!((far_corner.y - (200.0 + 160.0)).abs() < 1e-9);
}

#[test]
fn overlay_without_preview_size_is_rejected() {
    let mut snap = snapshot(100, 50);
    snap.overlay = Some(overlay_at(Point::ZERO, 1.0, 4, 4));
    let err = plan_export(
        &snap,
        &[],
        &[],
        &CompositorSettings::default(),
        ExportVariant::Combined,
    )
    .unwrap_err();
    assert!(err.is_invalid_geometry());
}

#[test]
fn mismatched_panels_are_rejected() {
    let mut snap = snapshot(100, 50);
    snap.mirrored = RasterImage::solid(99, 50, [0, 0, 0, 255]).unwrap();
    assert!(
        plan_export(
            &snap,
            &[],
            &[],
            &CompositorSettings::default(),
            ExportVariant::Combined
        )
        .is_err()
    );
}

#[test]
fn strips_draw_frozen_left_and_live_right_with_shared_geometry() {
    let mut snap = snapshot(200, 300);
    snap.frozen_thumbnails = vec![
        ThumbnailSlot::with_image("Folder 1", "a"),
        ThumbnailSlot::empty("Folder 2"),
    ];
    snap.live_thumbnails = vec![
        ThumbnailSlot::with_image("Folder 1", "a"),
        ThumbnailSlot::with_image("Folder 2", "b"),
    ];
    let thumb = RasterImage::solid(8, 8, [0, 0, 255, 255]).unwrap();
    let left = vec![Some(thumb.clone()), None];
    let right = vec![Some(thumb.clone()), Some(thumb)];
    let settings = CompositorSettings::default();

    let plan = plan_export(&snap, &left, &right, &settings, ExportVariant::WithSidebars).unwrap();
    let circles: Vec<(Point, f64)> = plan
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::CircleImage {
                center, diameter, ..
            } => Some((*center, *diameter)),
            _ => None,
        })
        .collect();

    let layout = SidebarLayout::compute(2, 300.0, settings.thumbnail_min_diameter).unwrap();
    let canvas_w = f64::from(plan.canvas.width);
    assert_eq!(
        circles,
        vec![
            (Point::new(32.0, layout.center_y(0)), layout.container_diameter),
            (Point::new(canvas_w - 32.0, layout.center_y(0)), layout.container_diameter),
            (Point::new(canvas_w - 32.0, layout.center_y(1)), layout.container_diameter),
        ]
    );
}

#[test]
fn settings_reject_out_of_range_min_diameter() {
    let mut settings = CompositorSettings::default();
    assert!(settings.validate().is_ok());
    settings.thumbnail_min_diameter = 10.0;
    assert!(settings.validate().unwrap_err().is_invalid_geometry());
}

#[test]
fn partial_settings_json_fills_defaults() {
    let settings: CompositorSettings = serde_json::from_str(r#"{"sidebar_width": 90}"#).unwrap();
    assert_eq!(settings.sidebar_width, 90);
    assert_eq!(
        settings.thumbnail_min_diameter,
        CompositorSettings::default().thumbnail_min_diameter
    );
}
