use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::{
        core::{Rect, Rgba8},
        error::{SlideError, SlideResult},
    },
    render::framebuffer::Framebuffer,
};

/// Decoded raster image in straight RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major, `width * height` pixels.
    pub pixels: Vec<Rgba8>,
}

impl DecodedImage {
    pub fn extent(&self) -> Rect {
        Rect::extent(self.width, self.height)
    }
}

/// Read and decode an image file.
pub fn decode_image_file(path: &Path) -> SlideResult<DecodedImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| SlideError::asset(format!("read image '{}': {e}", path.display())))?;
    decode_image(&bytes)
        .map_err(|e| SlideError::asset(format!("image '{}': {e}", path.display())))
}

/// Decode encoded image bytes (any format `image` recognizes) to RGBA8.
pub fn decode_image(bytes: &[u8]) -> SlideResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(DecodedImage {
        width,
        height,
        pixels: to_pixels(rgba.as_raw()),
    })
}

/// Resample `img` to exactly `width` x `height`.
pub fn resample(img: &DecodedImage, width: u32, height: u32) -> SlideResult<DecodedImage> {
    if width == 0 || height == 0 {
        return Err(SlideError::asset(format!(
            "cannot resample to {width}x{height}"
        )));
    }
    if img.width == width && img.height == height {
        return Ok(img.clone());
    }

    let raw: Vec<u8> = img.pixels.iter().flat_map(|p| p.to_array()).collect();
    let src = image::RgbaImage::from_raw(img.width, img.height, raw)
        .ok_or_else(|| SlideError::asset("image buffer does not match its dimensions"))?;
    let out = image::imageops::resize(&src, width, height, image::imageops::FilterType::Triangle);

    Ok(DecodedImage {
        width,
        height,
        pixels: to_pixels(out.as_raw()),
    })
}

/// Write a framebuffer as an RGBA8 PNG.
pub fn encode_png(path: &Path, fb: &Framebuffer) -> SlideResult<()> {
    image::save_buffer_with_format(
        path,
        &fb.to_rgba8_bytes(),
        fb.width(),
        fb.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| SlideError::encode(format!("write png '{}': {e}", path.display())))
}

fn to_pixels(raw: &[u8]) -> Vec<Rgba8> {
    raw.chunks_exact(4)
        .map(|p| Rgba8::new(p[0], p[1], p[2], p[3]))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
