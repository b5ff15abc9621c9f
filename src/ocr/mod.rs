//! OCR domain — the external recognition capability and the local checks
//! applied to what it returns.
//!
//! `Recognizer` is the only seam to the outside world. The production
//! implementation is `llm::VisionRecognizer`; tests script their own.

pub mod candidates;
pub mod heuristics;

pub use candidates::recognition_candidates;
pub use heuristics::{looks_valid_ocr_text, truncate_chars};

use crate::capture::EncodedImage;
use crate::error::RecognitionError;

/// Something that turns an encoded question photo into question text.
///
/// Implementations must complete or fail within a bounded time; a failure
/// carries upstream detail in `RecognitionError` when available.
#[allow(async_fn_in_trait)]
pub trait Recognizer {
    async fn recognize_question(&self, image: &EncodedImage) -> Result<String, RecognitionError>;
}
