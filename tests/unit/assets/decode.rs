use std::io::Cursor;

use super::*;

#[test]
fn decode_png_keeps_straight_alpha() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let decoded = decode_image(&buf).unwrap();
    assert_eq!(decoded.width(), 1);
    assert_eq!(decoded.height(), 1);
    assert_eq!(decoded.pixel(0, 0), Some([100, 50, 200, 128]));
}

#[test]
fn garbage_bytes_are_a_decode_failure() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, FlipError::Decode(_)));
}
