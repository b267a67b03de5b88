//! Encoding resized rasters back into the input's format.
//!
//! The output surface is 8-bit: JPEG gets RGB (alpha is dropped), PNG and
//! WEBP get RGBA. `quality` only affects JPEG; PNG and WEBP are lossless.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageResult};

use crate::types::MimeType;

/// Map a normalized quality in [0, 1] onto the JPEG 1..=100 scale.
pub fn jpeg_quality(quality: f32) -> u8 {
    let scaled = (quality.clamp(0.0, 1.0) * 100.0).round() as u8;
    scaled.max(1)
}

/// Encode `image` as `mime`.
pub fn encode(image: &DynamicImage, mime: MimeType, quality: f32) -> ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    match mime {
        MimeType::Jpeg => {
            let rgb = image.to_rgb8();
            JpegEncoder::new_with_quality(&mut buf, jpeg_quality(quality)).write_image(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                ExtendedColorType::Rgb8,
            )?;
        }
        MimeType::Png => {
            let rgba = image.to_rgba8();
            PngEncoder::new(&mut buf).write_image(
                rgba.as_raw(),
                rgba.width(),
                rgba.height(),
                ExtendedColorType::Rgba8,
            )?;
        }
        MimeType::Webp => {
            let rgba = image.to_rgba8();
            WebPEncoder::new_lossless(&mut buf).write_image(
                rgba.as_raw(),
                rgba.width(),
                rgba.height(),
                ExtendedColorType::Rgba8,
            )?;
        }
    }
    Ok(buf)
}
