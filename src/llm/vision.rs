//! Vision-model OCR over an OpenAI-compatible chat completions API.
//!
//! One non-streaming request per candidate crop, bounded by a wall-clock
//! timeout. On timeout the in-flight request is dropped and the attempt
//! fails with `RecognitionError::Timeout`.

use super::prompts::build_ocr_request;
use super::provider::VisionSettings;
use crate::capture::EncodedImage;
use crate::config::RecognitionConfig;
use crate::error::RecognitionError;
use crate::ocr::Recognizer;
use crate::text::normalize_provider_text;
use std::time::Duration;

pub struct VisionRecognizer {
    client: reqwest::Client,
    settings: VisionSettings,
    timeout: Duration,
}

impl VisionRecognizer {
    pub fn new(settings: VisionSettings, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
            timeout,
        }
    }

    /// Settings from the environment, timeout from `config`.
    pub fn from_env(config: &RecognitionConfig) -> Result<Self, RecognitionError> {
        Ok(Self::new(VisionSettings::resolve()?, config.request_timeout()))
    }

    async fn request(&self, image: &EncodedImage) -> Result<String, RecognitionError> {
        let body = build_ocr_request(&self.settings.model, &image.to_data_url());
        let response = self
            .client
            .post(self.settings.completions_url())
            .bearer_auth(&self.settings.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let json: serde_json::Value = match serde_json::from_str(&body) {
            Ok(json) => json,
            Err(e) if status.is_success() => {
                log::error!("[LLM] Vision API returned unparseable body ({} bytes): {}", body.len(), e);
                return Err(RecognitionError::Provider {
                    status: status.as_u16(),
                    detail: "vision OCR response was not valid JSON".to_string(),
                });
            }
            // Error bodies are often plain text; status handling below covers them.
            Err(_) => serde_json::Value::Null,
        };

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            log::error!("[LLM] Vision API rejected credentials ({})", status);
            return Err(RecognitionError::Unauthorized);
        }
        if !status.is_success() {
            let detail = json["error"]["message"]
                .as_str()
                .unwrap_or("vision OCR request failed")
                .to_string();
            log::error!("[LLM] Vision API returned {}: {}", status, detail);
            return Err(RecognitionError::Provider {
                status: status.as_u16(),
                detail,
            });
        }

        let raw = json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .trim();
        let text = normalize_provider_text(raw);
        if text.is_empty() {
            log::warn!("[LLM] Vision API returned no question text");
            return Err(RecognitionError::EmptyResult);
        }

        if let Some(usage) = json.get("usage") {
            log::info!(
                "[LLM] Tokens: prompt={}, completion={}",
                usage["prompt_tokens"].as_u64().unwrap_or(0),
                usage["completion_tokens"].as_u64().unwrap_or(0)
            );
        }
        Ok(text)
    }
}

impl Recognizer for VisionRecognizer {
    async fn recognize_question(&self, image: &EncodedImage) -> Result<String, RecognitionError> {
        let start = std::time::Instant::now();
        log::info!(
            "[LLM] OCR request: {}x{}, {} bytes",
            image.width,
            image.height,
            image.bytes.len()
        );
        match tokio::time::timeout(self.timeout, self.request(image)).await {
            Ok(result) => {
                log::info!("[LLM] OCR latency: {}ms", start.elapsed().as_millis());
                result
            }
            Err(_) => {
                log::warn!("[LLM] OCR request abandoned after {:?}", self.timeout);
                Err(RecognitionError::Timeout(self.timeout.as_secs()))
            }
        }
    }
}
