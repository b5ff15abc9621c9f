//! Crop-to-raster exports.
//!
//! The same crop geometry feeds two consumers with different trade-offs:
//! storage keeps a high-fidelity crop, recognition gets a tighter,
//! more compressed one bounded by both edge length and pixel count.

use super::{EditorImage, EncodedImage};
use crate::config::RecognitionConfig;
use crate::crop::{source_rect, CropBox, SourceRect, Viewport};
use crate::error::CaptureError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

/// `max(2, round(dim * scale))` on both axes.
pub fn scaled_size(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let w = (width as f64 * scale).round().max(2.0) as u32;
    let h = (height as f64 * scale).round().max(2.0) as u32;
    (w, h)
}

/// Crop of the current box for storage/display: longest edge capped at
/// `config.storage_max_edge`, JPEG at `config.storage_quality`.
pub fn export_for_storage(
    image: &EditorImage,
    viewport: Viewport,
    crop: &CropBox,
    config: &RecognitionConfig,
) -> Result<EncodedImage, CaptureError> {
    let rect = source_rect(crop, viewport, image.natural_size())?;
    let scale = (config.storage_max_edge as f64 / rect.longest_edge() as f64).min(1.0);
    render(image, &rect, scale, config.storage_quality)
}

/// Crop of an arbitrary candidate box for recognition, scaled by the tighter
/// of the edge cap and the pixel-count cap.
pub fn export_for_recognition(
    image: &EditorImage,
    viewport: Viewport,
    candidate: &CropBox,
    config: &RecognitionConfig,
) -> Result<EncodedImage, CaptureError> {
    let rect = source_rect(candidate, viewport, image.natural_size())?;
    let edge_scale = (config.max_ocr_edge as f64 / rect.longest_edge() as f64).min(1.0);
    let pixel_scale = (config.max_ocr_pixels as f64 / rect.area().max(1) as f64)
        .sqrt()
        .min(1.0);
    render(image, &rect, edge_scale.min(pixel_scale), config.ocr_quality)
}

fn render(
    image: &EditorImage,
    rect: &SourceRect,
    scale: f64,
    quality: u8,
) -> Result<EncodedImage, CaptureError> {
    let start = std::time::Instant::now();
    let cropped = image.pixels.crop_imm(rect.x, rect.y, rect.width, rect.height);
    let (target_w, target_h) = scaled_size(rect.width, rect.height, scale);
    let target = if (target_w, target_h) == (cropped.width(), cropped.height()) {
        cropped
    } else {
        cropped.resize_exact(target_w, target_h, FilterType::Triangle)
    };
    let encoded = encode_jpeg(&target, quality)?;
    log::debug!(
        "[CAPTURE] Region {}x{} at ({},{}) -> {}x{} q{} in {}ms",
        rect.width,
        rect.height,
        rect.x,
        rect.y,
        target_w,
        target_h,
        quality,
        start.elapsed().as_millis()
    );
    Ok(encoded)
}

/// Encode as baseline JPEG. Alpha is dropped.
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<EncodedImage, CaptureError> {
    let rgb = image.to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| CaptureError::CanvasUnavailable(format!("JPEG encode failed: {}", e)))?;
    Ok(EncodedImage {
        bytes,
        mime: "image/jpeg",
        width: rgb.width(),
        height: rgb.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn editor(width: u32, height: u32) -> EditorImage {
        let pixels = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30])));
        let encoded = encode_jpeg(&pixels, 88).unwrap();
        EditorImage { pixels, encoded }
    }

    #[test]
    fn storage_export_caps_longest_edge() {
        let image = editor(2200, 1100);
        let out = export_for_storage(&image, Viewport::fitted((2200, 1100)), &CropBox::FULL, &RecognitionConfig::default())
            .unwrap();
        assert_eq!((out.width, out.height), (1800, 900));
    }

    #[test]
    fn storage_export_keeps_small_crops() {
        let image = editor(1000, 800);
        let out = export_for_storage(&image, Viewport::new(500.0, 400.0), &CropBox::DEFAULT, &RecognitionConfig::default())
            .unwrap();
        assert_eq!((out.width, out.height), (800, 560));
    }

    #[test]
    fn recognition_export_respects_pixel_budget() {
        // A square crop under the edge cap still exceeds 1.5M pixels.
        let config = RecognitionConfig::default();
        let image = editor(1400, 1400);
        let out = export_for_recognition(&image, Viewport::fitted((1400, 1400)), &CropBox::FULL, &config).unwrap();
        assert!(out.width < 1400);
        assert_eq!(out.width, out.height);
        assert!((out.width as u64 * out.height as u64) <= config.max_ocr_pixels + 2_000);
    }

    #[test]
    fn recognition_export_edge_cap() {
        let config = RecognitionConfig::default();
        let image = editor(2200, 400);
        let out = export_for_recognition(&image, Viewport::fitted((2200, 400)), &CropBox::FULL, &config).unwrap();
        assert_eq!(out.width, 1400);
        assert_eq!(out.height, 255);
    }
}
