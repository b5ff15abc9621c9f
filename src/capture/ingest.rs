//! Camera/gallery ingestion: decode, then bound the editor raster.

use super::{encode_jpeg, mime_for, scaled_size, EditorImage, EncodedImage};
use crate::config::RecognitionConfig;
use crate::error::CaptureError;
use image::imageops::FilterType;

/// Decode `bytes` and downscale so the longest edge is at most
/// `config.max_editor_edge`.
///
/// Images already within the cap pass through untouched, original bytes
/// included. Larger ones are resampled and re-encoded as JPEG at
/// `config.editor_quality`.
pub fn ingest_image(bytes: &[u8], config: &RecognitionConfig) -> Result<EditorImage, CaptureError> {
    let start = std::time::Instant::now();
    let decoded = image::load_from_memory(bytes).map_err(|e| CaptureError::ImageDecode(e.to_string()))?;
    let (width, height) = (decoded.width(), decoded.height());
    log::info!(
        "[CAPTURE] Decoded {}x{} ({} bytes) in {}ms",
        width,
        height,
        bytes.len(),
        start.elapsed().as_millis()
    );

    let scale = (config.max_editor_edge as f64 / width.max(height) as f64).min(1.0);
    if scale >= 0.999 {
        return Ok(EditorImage {
            pixels: decoded,
            encoded: EncodedImage {
                bytes: bytes.to_vec(),
                mime: mime_for(bytes),
                width,
                height,
            },
        });
    }

    let (target_w, target_h) = scaled_size(width, height, scale);
    let pixels = decoded.resize_exact(target_w, target_h, FilterType::Triangle);
    let encoded = encode_jpeg(&pixels, config.editor_quality)?;
    log::info!(
        "[CAPTURE] Downscaled to {}x{} ({} bytes) in {}ms",
        target_w,
        target_h,
        encoded.bytes.len(),
        start.elapsed().as_millis()
    );

    Ok(EditorImage { pixels, encoded })
}
