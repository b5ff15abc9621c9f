//! Error taxonomy for the capture pipeline.
//!
//! `CaptureError` is what every library entry point returns.
//! `RecognitionError` is owned by the external recognition call and
//! wrapped into `CaptureError::Recognition` when it aborts a sequence.

use thiserror::Error;

/// Shown when a recognition attempt fails outright.
pub const RETRY_GUIDANCE_MESSAGE: &str = "Recognition failed, please try again in a moment.";

/// Shown when every candidate came back empty or failed the validity heuristic.
pub const INCOMPLETE_RESULT_MESSAGE: &str =
    "The question may be incomplete. Adjust the crop box and recognize again.";

/// Shown when the user asks to continue before capturing anything.
pub const NO_IMAGE_MESSAGE: &str = "Take a photo or choose one from the gallery first.";

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to decode image: {0}")]
    ImageDecode(String),

    #[error("no image loaded")]
    NoImage,

    #[error("image not ready: {0}")]
    ImageNotReady(&'static str),

    #[error("canvas unavailable: {0}")]
    CanvasUnavailable(String),

    #[error(transparent)]
    Recognition(#[from] RecognitionError),

    #[error("a recognition request is already in flight")]
    Busy,

    #[error("configuration error: {0}")]
    Config(String),
}

impl CaptureError {
    /// Short message suitable for the capture screen's error line.
    pub fn user_message(&self) -> String {
        match self {
            CaptureError::ImageDecode(_) => "Could not read the image, please try again.".to_string(),
            CaptureError::NoImage => NO_IMAGE_MESSAGE.to_string(),
            CaptureError::Recognition(RecognitionError::EmptyResult) => INCOMPLETE_RESULT_MESSAGE.to_string(),
            CaptureError::Recognition(RecognitionError::Timeout(_)) => {
                "Recognition timed out. Retry or shrink the crop area.".to_string()
            }
            CaptureError::Recognition(e) => match e.detail() {
                Some(detail) => detail.to_string(),
                None => RETRY_GUIDANCE_MESSAGE.to_string(),
            },
            _ => RETRY_GUIDANCE_MESSAGE.to_string(),
        }
    }
}

/// Failure of a single call to the recognition service.
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("recognition transport failed: {0}")]
    Transport(String),

    #[error("recognition timed out after {0}s")]
    Timeout(u64),

    #[error("recognition service rejected credentials")]
    Unauthorized,

    #[error("recognition service returned {status}: {detail}")]
    Provider { status: u16, detail: String },

    #[error("no question text recognized")]
    EmptyResult,

    #[error("recognition service not configured: {0}")]
    NotConfigured(&'static str),
}

impl RecognitionError {
    /// Upstream detail, when the provider sent one back.
    pub fn detail(&self) -> Option<&str> {
        match self {
            RecognitionError::Provider { detail, .. } if !detail.is_empty() => Some(detail),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RecognitionError {
    fn from(e: reqwest::Error) -> Self {
        RecognitionError::Transport(e.to_string())
    }
}
