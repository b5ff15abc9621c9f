//! Escalating crop candidates for adaptive recognition.

use crate::config::RecognitionConfig;
use crate::crop::CropBox;

/// Ordered candidate boxes: the user's crop, each configured expansion of
/// it, then (optionally) the full image.
pub fn recognition_candidates(crop: &CropBox, config: &RecognitionConfig) -> Vec<CropBox> {
    let mut candidates = Vec::with_capacity(config.expansion_ratios.len() + 2);
    candidates.push(*crop);
    for &ratio in &config.expansion_ratios {
        // Expansion never shrinks.
        candidates.push(crop.expanded(ratio.max(1.0)));
    }
    if config.include_full_image {
        candidates.push(CropBox::FULL);
    }
    candidates
}
