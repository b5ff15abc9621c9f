//! Capture session — the state behind the capture screen.
//!
//! Holds the loaded image, the crop box and its interaction state, and the
//! recognition result. Every host action is one method here:
//! - load_image:   new photo → downscale → reset crop and results
//! - pointer_*:    drive the crop box state machine
//! - recognize:    adaptive recognition of the current crop
//! - finish:       storage crop + question text for the tagging step

use crate::capture::{export_for_storage, ingest_image, EditorImage, EncodedImage};
use crate::crop::{transition, CropBox, CropInteraction, DragMode, PointerEvent, Viewport};
use crate::error::{CaptureError, INCOMPLETE_RESULT_MESSAGE};
use crate::ocr::Recognizer;
use crate::pipeline::SmartRecognizer;
use crate::text::normalize_question_text;

/// Handed to the tagging/storage workflow when the user continues.
#[derive(Debug, Clone)]
pub struct CapturedQuestion {
    pub image: EncodedImage,
    pub question: String,
}

pub struct CaptureSession<R> {
    recognizer: SmartRecognizer<R>,
    image: Option<EditorImage>,
    crop: CropBox,
    interaction: CropInteraction,
    recognized_question: String,
    error_text: Option<String>,
    recognize_attempts: u32,
}

impl<R: Recognizer> CaptureSession<R> {
    pub fn new(recognizer: SmartRecognizer<R>) -> Self {
        Self {
            recognizer,
            image: None,
            crop: CropBox::DEFAULT,
            interaction: CropInteraction::Idle,
            recognized_question: String::new(),
            error_text: None,
            recognize_attempts: 0,
        }
    }

    pub fn image(&self) -> Option<&EditorImage> {
        self.image.as_ref()
    }

    pub fn crop(&self) -> CropBox {
        self.crop
    }

    pub fn interaction(&self) -> CropInteraction {
        self.interaction
    }

    pub fn recognized_question(&self) -> &str {
        &self.recognized_question
    }

    pub fn error_text(&self) -> Option<&str> {
        self.error_text.as_deref()
    }

    pub fn recognize_attempts(&self) -> u32 {
        self.recognize_attempts
    }

    pub fn is_recognizing(&self) -> bool {
        self.recognizer.is_recognizing()
    }

    /// Replace the current image. Resets crop, drag state and results.
    ///
    /// On a decode failure the previous image is kept.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<(), CaptureError> {
        self.error_text = None;
        self.recognized_question.clear();
        let image = ingest_image(bytes, self.recognizer.config()).map_err(|e| {
            self.error_text = Some(e.user_message());
            e
        })?;
        let (w, h) = image.natural_size();
        log::info!("[SESSION] Image loaded: {}x{}", w, h);
        self.image = Some(image);
        self.crop = CropBox::DEFAULT;
        self.interaction = CropInteraction::Idle;
        self.recognize_attempts = 0;
        Ok(())
    }

    /// Replace the crop box directly, e.g. when restoring a saved selection.
    ///
    /// Out-of-range boxes are pulled back to the nearest valid one. Returns
    /// the box actually in effect.
    pub fn set_crop(&mut self, crop: CropBox) -> CropBox {
        let clamped = crop.clamped();
        if clamped != crop {
            log::warn!("[CROP] Adjusted out-of-range crop {:?} to {:?}", crop, clamped);
        }
        self.crop = clamped;
        self.interaction = CropInteraction::Idle;
        clamped
    }

    fn apply(&mut self, event: PointerEvent) -> CropBox {
        let (state, crop) = transition(self.interaction, self.crop, event);
        self.interaction = state;
        self.crop = crop;
        crop
    }

    pub fn pointer_down(&mut self, client_x: f64, client_y: f64, mode: DragMode) -> CropBox {
        self.apply(PointerEvent::Down { client_x, client_y, mode })
    }

    pub fn pointer_move(&mut self, client_x: f64, client_y: f64, viewport: Viewport) -> CropBox {
        self.apply(PointerEvent::Move {
            client_x,
            client_y,
            rect_width: viewport.client_width,
            rect_height: viewport.client_height,
        })
    }

    pub fn pointer_up(&mut self) -> CropBox {
        self.apply(PointerEvent::Up)
    }

    pub fn pointer_cancel(&mut self) -> CropBox {
        self.apply(PointerEvent::Cancel)
    }

    async fn run_recognition(&mut self, viewport: Viewport) -> Result<String, CaptureError> {
        let image = self
            .image
            .as_ref()
            .ok_or(CaptureError::NoImage)?;
        let outcome = self.recognizer.recognize(image, viewport, &self.crop).await?;
        self.recognize_attempts += 1;
        Ok(normalize_question_text(&outcome.text))
    }

    /// Recognize the current crop.
    ///
    /// Returns the question text, or `None` when nothing usable came back
    /// (the error line then asks the user to adjust the crop). Without an
    /// image this is a no-op.
    pub async fn recognize(&mut self, viewport: Viewport) -> Result<Option<String>, CaptureError> {
        if self.image.is_none() {
            return Ok(None);
        }
        self.error_text = None;
        match self.run_recognition(viewport).await {
            Ok(question) if question.trim().is_empty() => {
                self.error_text = Some(INCOMPLETE_RESULT_MESSAGE.to_string());
                Ok(None)
            }
            Ok(question) => {
                self.recognized_question = question.clone();
                Ok(Some(question))
            }
            Err(CaptureError::Busy) => Err(CaptureError::Busy),
            Err(e) => {
                self.error_text = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Produce the storage crop and the question text, recognizing first if
    /// nothing has been recognized yet.
    pub async fn finish(&mut self, viewport: Viewport) -> Result<CapturedQuestion, CaptureError> {
        let result = self.try_finish(viewport).await;
        if let Err(e) = &result {
            if !matches!(e, CaptureError::Busy) {
                self.error_text = Some(e.user_message());
            }
        }
        result
    }

    async fn try_finish(&mut self, viewport: Viewport) -> Result<CapturedQuestion, CaptureError> {
        let image = self
            .image
            .as_ref()
            .ok_or(CaptureError::NoImage)?;
        let cropped = export_for_storage(image, viewport, &self.crop, self.recognizer.config())?;

        if self.recognized_question.trim().is_empty() {
            let question = self.run_recognition(viewport).await?;
            self.recognized_question = question;
        }
        if self.recognized_question.trim().is_empty() {
            return Err(CaptureError::Recognition(crate::error::RecognitionError::EmptyResult));
        }

        log::info!(
            "[SESSION] Captured {}x{} crop with {} chars of question text",
            cropped.width,
            cropped.height,
            self.recognized_question.chars().count()
        );
        Ok(CapturedQuestion {
            image: cropped,
            question: self.recognized_question.clone(),
        })
    }
}
