//! Vision provider resolution.
//!
//! Endpoint and model come from env vars with built-in defaults. The API key
//! comes from `VISION_API_KEY`, falling back to the OS keychain.

use super::prompts::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::error::RecognitionError;

const KEYRING_SERVICE: &str = "mistake-capture";
const KEYRING_USER: &str = "vision";

/// Everything needed to reach the hosted vision model.
#[derive(Clone)]
pub struct VisionSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

impl std::fmt::Debug for VisionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionSettings")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &format_args!("<{} chars>", self.api_key.len()))
            .finish()
    }
}

impl VisionSettings {
    /// Resolve from `VISION_BASE_URL`, `VISION_MODEL` and the stored key.
    pub fn resolve() -> Result<Self, RecognitionError> {
        let api_key = api_key().ok_or(RecognitionError::NotConfigured("no VISION_API_KEY set"))?;
        let base_url = non_empty_env("VISION_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = non_empty_env("VISION_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        log::info!("[LLM] Vision provider: {} (model {})", base_url, model);
        Ok(Self { base_url, model, api_key })
    }

    /// `<base_url>/chat/completions`.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// API key from env, then keychain.
fn api_key() -> Option<String> {
    if let Some(key) = non_empty_env("VISION_API_KEY") {
        return Some(key);
    }
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER).ok()?;
    match entry.get_password() {
        Ok(key) if !key.is_empty() => {
            log::info!("[LLM] Loaded vision key from OS keychain");
            Some(key)
        }
        _ => None,
    }
}

/// True if a key is available from any source.
pub fn is_configured() -> bool {
    api_key().is_some()
}

/// Store the API key in the OS keychain.
pub fn save_api_key(key: &str) -> Result<(), RecognitionError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)
        .map_err(|e| RecognitionError::Transport(format!("Keyring error: {}", e)))?;
    entry
        .set_password(key)
        .map_err(|e| RecognitionError::Transport(format!("Failed to save key: {}", e)))?;
    log::info!("[LLM] Vision key saved to OS keychain");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_url_handles_trailing_slash() {
        let settings = VisionSettings {
            base_url: "https://example.test/v1/".to_string(),
            model: "m".to_string(),
            api_key: "k".to_string(),
        };
        assert_eq!(settings.completions_url(), "https://example.test/v1/chat/completions");
    }

    #[test]
    fn debug_hides_key() {
        let settings = VisionSettings {
            base_url: "u".to_string(),
            model: "m".to_string(),
            api_key: "secret-key".to_string(),
        };
        assert!(!format!("{:?}", settings).contains("secret-key"));
    }
}
