//! Text domain — turning model output into readable question text.

mod sanitize;

pub use sanitize::{normalize_math_like_text, normalize_provider_text, normalize_question_text};
