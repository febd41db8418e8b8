use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn mime_from_extension_is_case_insensitive() {
    assert_eq!(ImageMime::from_file_name("a.JPG"), Some(ImageMime::Jpeg));
    assert_eq!(ImageMime::from_file_name("a.jpeg"), Some(ImageMime::Jpeg));
    assert_eq!(ImageMime::from_file_name("a.Png"), Some(ImageMime::Png));
    assert_eq!(ImageMime::from_file_name("a.gif"), None);
    assert_eq!(ImageMime::from_file_name("noext"), None);
}

#[test]
fn select_zero_files_clears() {
    assert!(matches!(select_files(&[]), Ok(Selection::Cleared)));
}

#[test]
fn select_many_files_is_rejected() {
    let paths = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
    assert_eq!(
        select_files(&paths).unwrap_err(),
        SelectionRejected::MultipleFiles(2)
    );
}

#[test]
fn select_one_file_loads_bytes_and_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Holiday.PNG");
    let bytes = png_bytes(4, 2);
    std::fs::write(&path, &bytes).unwrap();

    let Selection::Loaded(asset) = select_files(std::slice::from_ref(&path)).unwrap() else {
        panic!("expected a loaded asset");
    };
    assert_eq!(asset.name, "Holiday.PNG");
    assert_eq!(asset.mime, ImageMime::Png);
    assert_eq!(asset.bytes.len(), bytes.len());
    assert_eq!(asset.source.as_deref(), Some(path.as_path()));
    assert_eq!(asset.natural_size().unwrap(), (4, 2));
}

#[test]
fn missing_file_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.jpg");
    assert_eq!(
        select_files(&[path]).unwrap_err(),
        SelectionRejected::Unreadable("gone.jpg".to_string())
    );
}

#[test]
fn data_url_has_mime_prefix() {
    let asset = ImageAsset::from_bytes("x.png", vec![1, 2, 3]).unwrap();
    assert_eq!(asset.data_url(), "data:image/png;base64,AQID");
}

#[test]
fn garbage_bytes_have_no_natural_size() {
    let asset = ImageAsset::from_bytes("x.jpg", b"definitely not a jpeg".to_vec()).unwrap();
    assert!(asset.natural_size().is_err());
}
