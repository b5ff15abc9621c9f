//! Shared test helpers for recognition and session tests.

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, RgbImage};
use mistake_capture::capture::encode_jpeg;
use mistake_capture::{EditorImage, EncodedImage, RecognitionConfig, RecognitionError, Recognizer};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// PNG bytes of a flat light-gray image.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([235, 235, 235])));
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Editor image built directly, bypassing ingestion.
pub fn editor_image(width: u32, height: u32) -> EditorImage {
    let pixels = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([235, 235, 235])));
    let encoded = encode_jpeg(&pixels, 88).unwrap();
    EditorImage { pixels, encoded }
}

/// Default config without the inter-attempt pause.
pub fn fast_config() -> RecognitionConfig {
    let mut config = RecognitionConfig::default();
    config.attempt_pause_ms = 0;
    config
}

/// Recognizer that replays a fixed script and records what it was sent.
pub struct ScriptedRecognizer {
    script: Mutex<VecDeque<Result<String, RecognitionError>>>,
    seen: Mutex<Vec<(u32, u32)>>,
    delay: Duration,
}

impl ScriptedRecognizer {
    pub fn new(script: Vec<Result<String, RecognitionError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// `(width, height)` of every image received, in order.
    pub fn sizes(&self) -> Vec<(u32, u32)> {
        self.seen.lock().unwrap().clone()
    }
}

impl Recognizer for ScriptedRecognizer {
    async fn recognize_question(&self, image: &EncodedImage) -> Result<String, RecognitionError> {
        self.seen.lock().unwrap().push((image.width, image.height));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}
