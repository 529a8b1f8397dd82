use std::io::Cursor;

use super::*;

#[test]
fn decode_png_keeps_straight_alpha() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba.clone()).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let bmp = decode_image(&buf).unwrap();
    assert_eq!((bmp.width, bmp.height), (1, 1));
    assert_eq!(bmp.data, src_rgba);
}

#[test]
fn decode_garbage_is_input_error() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, PosterError::Input(_)), "{err}");
}

#[test]
fn missing_file_is_reported() {
    let path = std::env::temp_dir().join("postertile_missing_image_does_not_exist.png");
    assert!(read_image_file(&path).is_err());
}
