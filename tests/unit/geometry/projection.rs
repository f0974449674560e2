use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn factors_are_computed_per_axis() {
    let f = scale_factors(
        Dimensions::new(1920.0, 1080.0),
        Dimensions::new(480.0, 270.0),
    )
    .unwrap();
    assert_eq!(f, ScaleFactor { sx: 4.0, sy: 4.0 });
    assert!(f.is_uniform());

    let f = scale_factors(
        Dimensions::new(1920.0, 1080.0),
        Dimensions::new(640.0, 540.0),
    )
    .unwrap();
    assert_eq!(f, ScaleFactor { sx: 3.0, sy: 2.0 });
    assert!(!f.is_uniform());
}

#[test]
fn non_positive_preview_is_rejected() {
    let native = Dimensions::new(100.0, 100.0);
    for preview in [
        Dimensions::new(0.0, 10.0),
        Dimensions::new(10.0, 0.0),
        Dimensions::new(-5.0, 10.0),
    ] {
        let err = scale_factors(native, preview).unwrap_err();
        assert!(err.is_invalid_geometry());
    }
}

#[test]
fn to_source_scales_points_sizes_and_rects() {
    let f = ScaleFactor { sx: 2.0, sy: 3.0 };
    assert_eq!(f.to_source(Point::new(10.0, 10.0)), Point::new(20.0, 30.0));
    assert_eq!(f.to_source(Size::new(5.0, 4.0)), Size::new(10.0, 12.0));
    assert_eq!(f.to_source(Vec2::new(-1.0, 1.0)), Vec2::new(-2.0, 3.0));
    assert_eq!(
        f.to_source(Rect::new(1.0, 2.0, 3.0, 4.0)),
        Rect::new(2.0, 6.0, 6.0, 12.0)
    );
}

#[test]
fn preview_source_round_trip_holds_across_aspect_mismatch() {
    let cases = [
        (Dimensions::new(1920.0, 1080.0), Dimensions::new(480.0, 270.0)),
        (Dimensions::new(1280.0, 720.0), Dimensions::new(333.0, 384.0)),
        (Dimensions::new(37.0, 91.0), Dimensions::new(1000.0, 7.5)),
    ];
    let points = [
        Point::new(0.0, 0.0),
        Point::new(12.5, 99.25),
        Point::new(-40.0, 3.0),
    ];
    for (native, preview) in cases {
        let f = scale_factors(native, preview).unwrap();
        for p in points {
            let back = f.to_source(f.to_preview(p));
            assert!(close(back.x, p.x) && close(back.y, p.y), "{p:?} -> {back:?}");
        }
        let r = Rect::new(1.0, 2.0, 30.0, 40.0);
        let back = f.to_preview(f.to_source(r));
        assert!(close(back.x0, r.x0) && close(back.y1, r.y1));
    }
}
