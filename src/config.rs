//! Recognition configuration, resolved once by the calling environment.
//!
//! Platform tiers replace ambient "is this a phone" checks: the caller picks
//! a tier (or sets `CAPTURE_PLATFORM`) and passes the resulting
//! `RecognitionConfig` into ingestion, export and the recognition pipeline.
//!
//! Overrides may be persisted as JSON in
//! `<config_dir>/mistake-capture/recognition.json`.

use crate::error::CaptureError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Memory/performance tier of the device running the capture flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformTier {
    #[default]
    General,
    Constrained,
}

impl PlatformTier {
    /// Parse a tier name. Unknown values fall back to `General`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "constrained" | "ios" | "mobile" => PlatformTier::Constrained,
            _ => PlatformTier::General,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecognitionConfig {
    pub tier: PlatformTier,
    /// Longest edge of the interactive editor raster.
    pub max_editor_edge: u32,
    /// Longest edge of a recognition crop.
    pub max_ocr_edge: u32,
    /// Total pixel budget of a recognition crop.
    pub max_ocr_pixels: u64,
    /// Longest edge of the crop handed to storage.
    pub storage_max_edge: u32,
    /// Growth ratios tried after the user's own crop, in order.
    pub expansion_ratios: Vec<f64>,
    pub include_full_image: bool,
    pub editor_quality: u8,
    pub storage_quality: u8,
    pub ocr_quality: u8,
    pub min_valid_chars: usize,
    pub max_result_chars: usize,
    pub attempt_pause_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self::for_tier(PlatformTier::General)
    }
}

impl RecognitionConfig {
    pub fn for_tier(tier: PlatformTier) -> Self {
        let constrained = tier == PlatformTier::Constrained;
        Self {
            tier,
            max_editor_edge: if constrained { 1600 } else { 2200 },
            max_ocr_edge: if constrained { 1024 } else { 1400 },
            max_ocr_pixels: if constrained { 900_000 } else { 1_500_000 },
            storage_max_edge: 1800,
            expansion_ratios: if constrained { vec![1.15] } else { vec![1.2, 1.4] },
            include_full_image: true,
            editor_quality: 88,
            storage_quality: 86,
            ocr_quality: 84,
            min_valid_chars: 10,
            max_result_chars: 5000,
            attempt_pause_ms: 50,
            request_timeout_secs: 15,
        }
    }

    /// Tier from `CAPTURE_PLATFORM`, overlaid with the saved override file if any.
    pub fn from_env() -> Self {
        let tier = std::env::var("CAPTURE_PLATFORM")
            .map(|v| PlatformTier::parse(&v))
            .unwrap_or_default();
        log::info!("[CONFIG] Platform tier: {:?}", tier);
        match load_config(&config_path()) {
            Some(saved) if saved.tier == tier => saved,
            _ => Self::for_tier(tier),
        }
    }

    pub fn attempt_pause(&self) -> Duration {
        Duration::from_millis(self.attempt_pause_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Default location of the override file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mistake-capture")
        .join("recognition.json")
}

/// Load a saved config. Missing or invalid files yield `None`.
pub fn load_config(path: &Path) -> Option<RecognitionConfig> {
    let raw = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(config) => Some(config),
        Err(e) => {
            log::warn!("[CONFIG] Ignoring invalid {}: {}", path.display(), e);
            None
        }
    }
}

/// Persist a config, creating the parent directory if needed.
pub fn save_config(path: &Path, config: &RecognitionConfig) -> Result<(), CaptureError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| CaptureError::Config(format!("Failed to create config dir: {}", e)))?;
    }
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| CaptureError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, json)
        .map_err(|e| CaptureError::Config(format!("Failed to write config: {}", e)))?;
    log::info!("[CONFIG] Saved recognition config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constrained_tier_is_tighter() {
        let general = RecognitionConfig::for_tier(PlatformTier::General);
        let constrained = RecognitionConfig::for_tier(PlatformTier::Constrained);
        assert!(constrained.max_editor_edge < general.max_editor_edge);
        assert!(constrained.max_ocr_edge < general.max_ocr_edge);
        assert!(constrained.max_ocr_pixels < general.max_ocr_pixels);
        assert_eq!(constrained.expansion_ratios, vec![1.15]);
        assert_eq!(general.expansion_ratios, vec![1.2, 1.4]);
    }

    #[test]
    fn tier_names() {
        assert_eq!(PlatformTier::parse("iOS"), PlatformTier::Constrained);
        assert_eq!(PlatformTier::parse("constrained"), PlatformTier::Constrained);
        assert_eq!(PlatformTier::parse("desktop"), PlatformTier::General);
        assert_eq!(PlatformTier::parse(""), PlatformTier::General);
    }

    #[test]
    fn load_missing_config_returns_none() {
        let path = std::env::temp_dir().join("mistake-capture-test-missing/recognition.json");
        assert!(load_config(&path).is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let path = std::env::temp_dir().join("mistake-capture-test-roundtrip/recognition.json");
        let mut config = RecognitionConfig::for_tier(PlatformTier::Constrained);
        config.attempt_pause_ms = 0;

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path), Some(config));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: RecognitionConfig = serde_json::from_str(r#"{"maxOcrEdge": 900}"#).unwrap();
        assert_eq!(config.max_ocr_edge, 900);
        assert_eq!(config.max_editor_edge, 2200);
        assert_eq!(config.max_result_chars, 5000);
    }
}
