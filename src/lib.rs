//! mistake-capture — photo capture, crop and adaptive OCR for a student
//! mistake notebook.
//!
//! Module map:
//!   - capture   — ingestion/downscaling and crop exports
//!   - crop      — normalized crop box, drag state machine, display→pixel mapping
//!   - ocr       — recognizer seam, validity heuristics, candidate crops
//!   - pipeline  — adaptive multi-pass recognition
//!   - llm       — hosted vision model as the recognizer
//!   - text      — math-like text normalization
//!   - session   — capture screen state tying it all together

pub mod capture;
pub mod config;
pub mod crop;
pub mod error;
pub mod llm;
pub mod ocr;
pub mod pipeline;
pub mod session;
pub mod text;

pub use capture::{EditorImage, EncodedImage};
pub use config::{PlatformTier, RecognitionConfig};
pub use crop::{CropBox, CropInteraction, DragMode, PointerEvent, Viewport};
pub use error::{CaptureError, RecognitionError};
pub use ocr::Recognizer;
pub use pipeline::{run_smart_recognition, RecognitionOutcome, SmartRecognizer};
pub use session::{CaptureSession, CapturedQuestion};
pub use text::normalize_math_like_text;

/// Load `.env.local`, falling back to `.env`, from the working directory.
///
/// Only the first file found is loaded. Returns the path that was loaded.
pub fn load_env_files() -> Option<std::path::PathBuf> {
    for env_file in [".env.local", ".env"] {
        let path = std::path::PathBuf::from(env_file);
        if path.exists() {
            match dotenvy::from_path(&path) {
                Ok(_) => {
                    eprintln!("[STARTUP] Loaded {}", path.display());
                    return Some(path);
                }
                Err(e) => eprintln!("[STARTUP] Failed to load {}: {}", path.display(), e),
            }
        }
    }
    None
}
