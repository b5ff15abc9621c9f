//! Image capture domain — public API.
//!
//! Owns the loaded editor image and the rasters derived from it.
//! External code should only use the functions exported here.

mod ingest;
mod region;

pub use ingest::ingest_image;
pub use region::{encode_jpeg, export_for_recognition, export_for_storage, scaled_size};

use base64::Engine;
use image::DynamicImage;

/// The image shown in the crop editor.
///
/// Immutable once loaded; a new capture replaces it wholesale.
#[derive(Debug, Clone)]
pub struct EditorImage {
    /// Decoded pixels, already bounded by the editor edge cap.
    pub pixels: DynamicImage,
    /// Encoded form handed to the display layer.
    pub encoded: EncodedImage,
}

impl EditorImage {
    /// Natural `(width, height)` of the editor raster.
    pub fn natural_size(&self) -> (u32, u32) {
        (self.pixels.width(), self.pixels.height())
    }
}

/// An encoded raster plus the metadata downstream consumers need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    /// `data:<mime>;base64,<payload>`, the form the recognition endpoint accepts.
    pub fn to_data_url(&self) -> String {
        let payload = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.mime, payload)
    }
}

/// Best-effort MIME type sniffed from the container format.
pub(crate) fn mime_for(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Png) => "image/png",
        Ok(image::ImageFormat::WebP) => "image/webp",
        Ok(image::ImageFormat::Gif) => "image/gif",
        Ok(image::ImageFormat::Bmp) => "image/bmp",
        _ => "image/jpeg",
    }
}
