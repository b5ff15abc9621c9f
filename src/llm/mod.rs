//! LLM domain — hosted vision model used as the OCR backend.
//!
//! Public API for the recognition service boundary.
//! External code should only use the types exported here.
//!
//!   - prompts.rs  — OCR prompt + request body
//!   - provider.rs — endpoint/model/key resolution (env var, then OS keychain)
//!   - vision.rs   — `Recognizer` implementation over an OpenAI-compatible API

pub mod prompts;
pub mod provider;
mod vision;

pub use provider::VisionSettings;
pub use vision::VisionRecognizer;
