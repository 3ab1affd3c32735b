use std::io::Cursor;

use super::*;

fn encode(img: image::RgbaImage, format: image::ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let layer = decode_layer(&encode(img, image::ImageFormat::Png)).unwrap();

    assert_eq!(layer.width, 1);
    assert_eq!(layer.height, 1);
    assert_eq!(
        layer.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_rejects_garbage_and_unsupported_formats() {
    let err = decode_layer(b"definitely not an image").unwrap_err();
    assert!(matches!(err, TwibbonError::Decode(_)));

    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 255]));
    let bmp = encode(img, image::ImageFormat::Bmp);
    let err = decode_layer(&bmp).unwrap_err();
    assert!(err.to_string().contains("unsupported image format"));
}

#[test]
fn decode_truncated_png_is_a_decode_error() {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([9, 9, 9, 255]));
    let mut png = encode(img, image::ImageFormat::Png);
    png.truncate(png.len() / 2);
    assert!(matches!(decode_layer(&png), Err(TwibbonError::Decode(_))));
}

#[test]
fn solid_layer_fills_every_pixel() {
    let layer = solid_layer(3, 2, Rgba8::new(10, 20, 30, 255)).unwrap();
    assert_eq!(layer.rgba8_premul.len(), 3 * 2 * 4);
    assert!(
        layer
            .rgba8_premul
            .chunks_exact(4)
            .all(|px| px == [10, 20, 30, 255])
    );
    assert!(solid_layer(0, 2, Rgba8::WHITE).is_err());
}

#[test]
fn clones_share_pixels() {
    let a = solid_layer(1, 1, Rgba8::WHITE).unwrap();
    let b = a.clone();
    let c = solid_layer(1, 1, Rgba8::WHITE).unwrap();
    assert!(a.same_pixels(&b));
    assert!(!a.same_pixels(&c));
}

#[test]
fn sides_beyond_surface_limit_are_rejected() {
    let wide = image::RgbaImage::from_pixel(MAX_LAYER_SIDE + 1, 1, image::Rgba([1, 2, 3, 255]));
    let err = decode_layer(&encode(wide, image::ImageFormat::Png)).unwrap_err();
    assert!(matches!(err, TwibbonError::Decode(_)));
    assert!(err.to_string().contains("at most 65535"));

    assert!(solid_layer(MAX_LAYER_SIDE + 1, 1, Rgba8::WHITE).is_err());
    assert!(solid_layer(1, MAX_LAYER_SIDE, Rgba8::WHITE).is_ok());
}
