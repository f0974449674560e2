use std::path::PathBuf;

use super::*;
use crate::assets::decode::decode_image;
use crate::encode::png::encode_png;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::RasterImage;

fn fixture_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(dir: &Path, name: &str, img: &RasterImage) {
    std::fs::write(dir.join(name), encode_png(img).unwrap()).unwrap();
}

#[test]
fn minimal_job_fills_defaults() {
    let job = ExportJob::from_json(r#"{"frame": "frame.png"}"#).unwrap();
    assert_eq!(job.folders, default_folders());
    assert_eq!(job.variant, ExportVariant::WithSidebars);
    assert_eq!(job.facing, FacingMode::User);
    assert!(job.overlay.is_none());
    assert_eq!(job.settings, CompositorSettings::default());
}

#[test]
fn unknown_fields_are_rejected() {
    let err = ExportJob::from_json(r#"{"frame": "f.png", "colour": 3}"#).unwrap_err();
    assert!(matches!(err, FlipError::Validation(_)));
}

#[test]
fn job_replays_a_full_session() {
    let dir = fixture_dir("unit_job_full");
    write_png(&dir, "frame.png", &RasterImage::solid(40, 20, [200, 0, 0, 255]).unwrap());
    write_png(&dir, "logo.png", &RasterImage::solid(8, 6, [0, 200, 0, 255]).unwrap());
    write_png(&dir, "thumb.png", &RasterImage::solid(4, 4, [0, 0, 200, 255]).unwrap());

    let job = ExportJob::from_json(
        r#"{
            "frame": "frame.png",
            "preview": {"width": 20, "height": 10},
            "overlay": {
                "image": "logo.png",
                "crop": {
                    "displayed": {"width": 8, "height": 6},
                    "rect": {"x": 0, "y": 0, "width": 4, "height": 3}
                },
                "gestures": [{"position": {"x": 2, "y": 2}, "scale_x": 1.5, "scale_y": 1.5}],
                "save_rotation_deg": 0
            },
            "folders": [
                {"folder_id": "Folder 1", "image_ref": "thumb.png"},
                {"folder_id": "Folder 2"}
            ],
            "folder_updates": [{"folder_id": "Folder 2", "image_ref": "thumb.png"}]
        }"#,
    )
    .unwrap();

    let mut sink = InMemorySink::new();
    let receipt = run_job(&job, &dir, &mut sink).unwrap();
    assert_eq!(receipt.filename, "final_image.png");
    assert_eq!((receipt.width, receipt.height), (2 * 40 + 2 * 64, 20));

    let out = decode_image(sink.latest("final_image.png").unwrap()).unwrap();
    assert_eq!((out.width(), out.height()), (208, 20));
}

#[test]
fn missing_frame_is_input_unavailable() {
    let dir = fixture_dir("unit_job_missing");
    let job = ExportJob::from_json(r#"{"frame": "nope.png"}"#).unwrap();
    let err = run_job(&job, &dir, &mut InMemorySink::new()).unwrap_err();
    assert!(matches!(err, FlipError::InputUnavailable(_)));
}

#[test]
fn unknown_folder_update_fails_the_job() {
    let dir = fixture_dir("unit_job_bad_folder");
    write_png(&dir, "frame.png", &RasterImage::solid(4, 4, [9, 9, 9, 255]).unwrap());
    let job = ExportJob::from_json(
        r#"{"frame": "frame.png", "folder_updates": [{"folder_id": "Folder 42"}]}"#,
    )
    .unwrap();
    let mut sink = InMemorySink::new();
    assert!(run_job(&job, &dir, &mut sink).is_err());
    assert!(sink.downloads.is_empty());
}
