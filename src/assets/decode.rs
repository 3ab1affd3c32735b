use std::sync::Arc;

use anyhow::Context;

use crate::{
    TwibbonError, TwibbonResult,
    assets::Layer,
    foundation::core::{Rgba8, premultiply_rgba8_in_place},
};

/// Formats accepted at the file input boundary.
pub const ACCEPTED_FORMATS: [image::ImageFormat; 3] = [
    image::ImageFormat::Png,
    image::ImageFormat::Jpeg,
    image::ImageFormat::WebP,
];

/// Largest accepted side of any layer; drawing surfaces and paints are `u16`-sized.
pub const MAX_LAYER_SIDE: u32 = u16::MAX as u32;

/// Decode PNG/JPEG/WEBP bytes into a premultiplied layer.
///
/// The format is sniffed from the content, not taken from a file extension.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_layer(bytes: &[u8]) -> TwibbonResult<Layer> {
    let format = image::guess_format(bytes)
        .map_err(|e| TwibbonError::decode(format!("unrecognized image data: {e}")))?;
    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(TwibbonError::decode(format!(
            "unsupported image format {format:?} (expected png, jpeg or webp)"
        )));
    }

    let dyn_img = image::load_from_memory_with_format(bytes, format)
        .context("decode image from memory")
        .map_err(|e| TwibbonError::decode(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(TwibbonError::decode("image has no pixels"));
    }
    if width > MAX_LAYER_SIDE || height > MAX_LAYER_SIDE {
        return Err(TwibbonError::decode(format!(
            "image is {width}x{height}; each side must be at most {MAX_LAYER_SIDE} pixels"
        )));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    tracing::debug!(width, height, ?format, "decoded layer");

    Ok(Layer {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Build a layer filled with a single straight-alpha color.
pub fn solid_layer(width: u32, height: u32, color: Rgba8) -> TwibbonResult<Layer> {
    check_dims(width, height)?;
    let mut px = color.to_array();
    premultiply_rgba8_in_place(&mut px);
    let count = (width as usize) * (height as usize);
    let mut data = Vec::with_capacity(count * 4);
    for _ in 0..count {
        data.extend_from_slice(&px);
    }
    Ok(Layer {
        width,
        height,
        rgba8_premul: Arc::new(data),
    })
}

/// Wrap an already decoded straight-alpha RGBA image.
pub fn layer_from_rgba_image(img: image::RgbaImage) -> TwibbonResult<Layer> {
    let (width, height) = img.dimensions();
    check_dims(width, height)?;
    let mut data = img.into_raw();
    premultiply_rgba8_in_place(&mut data);
    Ok(Layer {
        width,
        height,
        rgba8_premul: Arc::new(data),
    })
}

pub(crate) fn check_dims(width: u32, height: u32) -> TwibbonResult<()> {
    if width == 0 || height == 0 {
        return Err(TwibbonError::validation("layer dimensions must be > 0"));
    }
    if width > MAX_LAYER_SIDE || height > MAX_LAYER_SIDE {
        return Err(TwibbonError::validation(format!(
            "layer sides must be at most {MAX_LAYER_SIDE} pixels"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
