//! Adaptive multi-pass recognition.
//!
//! candidate crop → rasterize → recognize → validity check, escalating from
//! the user's own crop to larger ones only when the text looks incomplete.
//! Any recognizer error, an empty provider reply included, aborts the
//! sequence; weak text only advances it.

use crate::capture::{export_for_recognition, EditorImage};
use crate::config::RecognitionConfig;
use crate::crop::{CropBox, Viewport};
use crate::error::CaptureError;
use crate::ocr::{looks_valid_ocr_text, recognition_candidates, truncate_chars, Recognizer};
use std::sync::atomic::{AtomicBool, Ordering};

/// What a recognition sequence produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionOutcome {
    /// Accepted text, or the longest partial result (possibly empty).
    pub text: String,
    /// Whether `text` passed the validity heuristic.
    pub accepted: bool,
    /// Number of candidates sent to the recognizer.
    pub attempts: usize,
}

/// Run the candidate sequence for `crop` and return the first valid text,
/// falling back to the longest text seen.
pub async fn run_smart_recognition<R: Recognizer>(
    recognizer: &R,
    image: &EditorImage,
    viewport: Viewport,
    crop: &CropBox,
    config: &RecognitionConfig,
) -> Result<RecognitionOutcome, CaptureError> {
    let pipeline_start = std::time::Instant::now();
    let candidates = recognition_candidates(crop, config);
    let mut best = String::new();
    let mut best_chars = 0;

    for (index, candidate) in candidates.iter().enumerate() {
        if index > 0 && config.attempt_pause_ms > 0 {
            tokio::time::sleep(config.attempt_pause()).await;
        }

        let encode_start = std::time::Instant::now();
        let encoded = export_for_recognition(image, viewport, candidate, config)?;
        let encode_ms = encode_start.elapsed().as_millis();

        let ocr_start = std::time::Instant::now();
        let text = recognizer.recognize_question(&encoded).await.map_err(|e| {
            log::error!("[OCR] Attempt {} failed, aborting sequence: {}", index + 1, e);
            e
        })?;
        let chars = text.chars().count();
        log::info!(
            "[OCR] Attempt {}/{}: {}x{} crop, encode={}ms, ocr={}ms, {} chars",
            index + 1,
            candidates.len(),
            encoded.width,
            encoded.height,
            encode_ms,
            ocr_start.elapsed().as_millis(),
            chars
        );

        if looks_valid_ocr_text(&text, config.min_valid_chars) {
            log::info!(
                "[PIPELINE] Accepted attempt {} after {}ms",
                index + 1,
                pipeline_start.elapsed().as_millis()
            );
            return Ok(RecognitionOutcome {
                text: truncate_chars(&text, config.max_result_chars),
                accepted: true,
                attempts: index + 1,
            });
        }

        if chars > best_chars {
            best = text;
            best_chars = chars;
        }
    }

    log::warn!(
        "[PIPELINE] No candidate passed validation after {}ms, keeping longest ({} chars)",
        pipeline_start.elapsed().as_millis(),
        best_chars
    );
    Ok(RecognitionOutcome {
        text: truncate_chars(&best, config.max_result_chars),
        accepted: false,
        attempts: candidates.len(),
    })
}

/// Single-flight flag for recognition requests.
#[derive(Debug, Default)]
pub struct RecognitionGate {
    busy: AtomicBool,
}

/// Holds the gate closed until dropped.
pub struct GateGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

impl RecognitionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the gate, or `None` if a request is already in flight.
    pub fn try_enter(&self) -> Option<GateGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GateGuard { busy: &self.busy })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// A recognizer plus the configuration and gate for running sequences
/// against it. Safe to share: overlapping calls get `CaptureError::Busy`.
pub struct SmartRecognizer<R> {
    recognizer: R,
    config: RecognitionConfig,
    gate: RecognitionGate,
}

impl<R: Recognizer> SmartRecognizer<R> {
    pub fn new(recognizer: R, config: RecognitionConfig) -> Self {
        Self {
            recognizer,
            config,
            gate: RecognitionGate::new(),
        }
    }

    pub fn config(&self) -> &RecognitionConfig {
        &self.config
    }

    pub fn is_recognizing(&self) -> bool {
        self.gate.is_busy()
    }

    pub async fn recognize(
        &self,
        image: &EditorImage,
        viewport: Viewport,
        crop: &CropBox,
    ) -> Result<RecognitionOutcome, CaptureError> {
        let Some(_guard) = self.gate.try_enter() else {
            log::info!("[PIPELINE] Recognition already in flight, ignoring request");
            return Err(CaptureError::Busy);
        };
        run_smart_recognition(&self.recognizer, image, viewport, crop, &self.config).await
    }
}
