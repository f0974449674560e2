use super::*;
use crate::foundation::core::{Point, Size, Vec2};
use crate::geometry::projection::scale_factors;
use crate::foundation::error::FlipError;

fn gradient(w: u32, h: u32) -> RasterImage {
    RasterImage::new(image::RgbaImage::from_fn(w, h, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    }))
    .unwrap()
}

#[test]
fn upload_starts_with_identity_and_original_pixels() {
    let img = gradient(40, 30);
    let slot = OverlaySlot::upload(img.clone());
    assert_eq!(*slot.transform(), OverlayTransform::identity());
    assert!(slot.pixels().shares_pixels_with(&img));
    assert!(slot.original().shares_pixels_with(&img));
}

#[test]
fn recrop_starts_from_original_upload() {
    let displayed = Dimensions::new(200.0, 160.0);
    let a = CropRect::new(10.0, 10.0, 100.0, 80.0);
    let b = CropRect::new(50.0, 40.0, 60.0, 30.0);

    let mut twice = OverlaySlot::upload(gradient(400, 320));
    twice.crop(displayed, a).unwrap();
    twice.crop(displayed, b).unwrap();

    let mut once = OverlaySlot::upload(gradient(400, 320));
    once.crop(displayed, b).unwrap();

    assert_eq!(twice.working(), once.working());
    assert_eq!((twice.working().width(), twice.working().height()), (60, 30));
    assert_eq!(twice.original(), once.original());
}

#[test]
fn failed_crop_keeps_previous_overlay() {
    let displayed = Dimensions::new(200.0, 160.0);
    let mut slot = OverlaySlot::upload(gradient(400, 320));
    slot.crop(displayed, CropRect::new(0.0, 0.0, 50.0, 50.0))
        .unwrap();
    let before = slot.working().clone();

    let err = slot
        .crop(displayed, CropRect::new(190.0, 0.0, 50.0, 50.0))
        .unwrap_err();
    assert!(matches!(err, FlipError::OutOfBounds { .. }));
    assert_eq!(slot.working(), &before);
}

#[test]
fn repeated_gestures_scale_against_the_asset() {
    let mut slot = OverlaySlot::upload(gradient(40, 30));
    let report = GestureReport::new(Point::new(5.0, 5.0), 2.0, 3.0).with_rotation(45.0);
    for _ in 0..3 {
        assert_eq!(slot.apply_gesture(&report).unwrap(), GestureOutcome::Applied);
    }
    assert_eq!(slot.transform().scale, Vec2::new(2.0, 3.0));
    assert_eq!(slot.pixels().dimensions(), Dimensions::new(40.0, 30.0));

    let unit = scale_factors(Dimensions::new(100.0, 100.0), Dimensions::new(100.0, 100.0)).unwrap();
    let placed = slot.transform().project(slot.pixels().size(), unit);
    assert_eq!(placed.size, Size::new(80.0, 90.0));
    assert_eq!(placed.rotation_deg, 45.0);
}

#[test]
fn crop_keeps_scale_relative_to_the_new_asset() {
    let mut slot = OverlaySlot::upload(gradient(100, 100));
    slot.apply_gesture(&GestureReport::new(Point::ZERO, 1.5, 1.5))
        .unwrap();
    slot.crop(Dimensions::new(100.0, 100.0), CropRect::new(0.0, 0.0, 20.0, 10.0))
        .unwrap();
    assert_eq!(slot.pixels().dimensions(), Dimensions::new(20.0, 10.0));
    assert!(!slot.pixels().shares_pixels_with(slot.original()));
    assert_eq!(slot.transform().scale, Vec2::new(1.5, 1.5));

    let unit = scale_factors(Dimensions::new(10.0, 10.0), Dimensions::new(10.0, 10.0)).unwrap();
    let placed = slot.transform().project(slot.pixels().size(), unit);
    assert_eq!(placed.size, Size::new(30.0, 15.0));

    slot.reset_crop();
    assert_eq!(slot.pixels(), slot.original());
}

#[test]
fn locked_slot_rejects_gestures() {
    let mut slot = OverlaySlot::upload(gradient(10, 10));
    slot.transform_mut().save(0.0);
    let outcome = slot
        .apply_gesture(&GestureReport::new(Point::new(1.0, 1.0), 4.0, 4.0))
        .unwrap();
    assert_eq!(outcome, GestureOutcome::RejectedLocked);
    assert_eq!(slot.transform().scale, Vec2::new(1.0, 1.0));
}
