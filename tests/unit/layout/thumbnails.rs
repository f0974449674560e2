use super::*;

fn slots(n: usize) -> Vec<ThumbnailSlot> {
    (1..=n)
        .map(|i| ThumbnailSlot::empty(format!("Folder {i}")))
        .collect()
}

#[test]
fn five_slots_in_300px_are_ordered_and_disjoint() {
    let layout = SidebarLayout::compute(5, 300.0, 30.0).unwrap();
    assert_eq!(layout.container_diameter, 46.0);
    assert!(layout.container_diameter <= MAX_THUMBNAIL_DIAMETER);
    assert!(layout.container_diameter >= 30.0);
    assert!(layout.vertical_spacing >= 0.0);

    let centers = layout.centers(StripSide::Left, 64.0, 1000.0);
    assert_eq!(centers.len(), 5);
    for pair in centers.windows(2) {
        assert!(pair[1].y > pair[0].y);
        assert!(pair[1].y - pair[0].y >= layout.container_diameter);
    }
    let last = centers[4].y + layout.container_diameter / 2.0;
    assert!(last <= 300.0 + 1e-9);
}

#[test]
fn diameter_is_capped_at_80_for_tall_strips() {
    let layout = SidebarLayout::compute(2, 2000.0, 20.0).unwrap();
    assert_eq!(layout.container_diameter, MAX_THUMBNAIL_DIAMETER);
    let expected_spacing = (2000.0 - 160.0) / 3.0;
    assert!((layout.vertical_spacing - expected_spacing).abs() < 1e-9);
    assert!((layout.center_y(0) - (expected_spacing + 40.0)).abs() < 1e-9);
}

#[test]
fn diameter_never_drops_below_lower_bound() {
    let layout = SidebarLayout::compute(6, 120.0, 40.0).unwrap();
    assert_eq!(layout.container_diameter, 40.0);
}

#[test]
fn invalid_inputs_are_rejected() {
    assert!(SidebarLayout::compute(3, 0.0, 30.0).unwrap_err().is_invalid_geometry());
    assert!(SidebarLayout::compute(3, 300.0, 0.0).unwrap_err().is_invalid_geometry());
    assert!(SidebarLayout::compute(3, 300.0, 90.0).unwrap_err().is_invalid_geometry());
}

#[test]
fn zero_slots_produce_no_centers() {
    let layout = SidebarLayout::compute(0, 300.0, 30.0).unwrap();
    assert!(layout.centers(StripSide::Right, 64.0, 500.0).is_empty());
}

#[test]
fn strip_sides_center_on_their_edge() {
    assert_eq!(StripSide::Left.center_x(64.0, 1000.0), 32.0);
    assert_eq!(StripSide::Right.center_x(64.0, 1000.0), 968.0);
}

#[test]
fn empty_slots_keep_their_position_reserved() {
    let layout = SidebarLayout::compute(4, 400.0, 30.0).unwrap();
    let mut s = slots(4);
    s[2].image_ref = Some("c.png".to_string());
    let img = RasterImage::solid(4, 4, [1, 2, 3, 255]).unwrap();
    let images = vec![None, None, Some(img), None];

    let placed = place_thumbnails(&s, &images, &layout, StripSide::Right, 64.0, 800.0);
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].slot_index, 2);
    assert_eq!(placed[0].folder_id, "Folder 3");
    assert_eq!(placed[0].center, Point::new(768.0, layout.center_y(2)));
    assert_eq!(placed[0].diameter, layout.container_diameter);
}
