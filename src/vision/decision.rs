//! Signature presence decision
//!
//! A signature needs enough ink, ink broken into several strokes, and either
//! several stroke blocks or one unusually long stroke. The confidence score is
//! a fixed weighted sum for display, not a probability.

use serde::{Deserialize, Serialize};

use super::classifier::{DetectionOptions, PixelStats};
use super::geometry::SignatureRegion;

const DENSITY_WEIGHT: f64 = 120.0;
const STROKE_WEIGHT: f64 = 60.0;
const BLOCK_WEIGHT: f64 = 15.0;
const BLOCK_LENGTH_WEIGHT: f64 = 0.2;
const MAX_CONFIDENCE: f64 = 100.0;

/// Outcome of signature analysis for one barcode
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureVerdict {
    pub detected: bool,
    /// Explainability score (0-100)
    pub confidence: f64,
    pub pixel_density: f64,
    pub stroke_density: f64,
    pub potential_blocks: u32,
    pub max_block_length: u32,
    /// Area that was inspected, if one could be derived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<SignatureRegion>,
}

impl SignatureVerdict {
    /// Verdict for barcodes whose geometry gives nothing to inspect
    pub fn not_detected() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: SignatureRegion) -> Self {
        self.region = Some(region);
        self
    }
}

/// Weighted score, clamped to 0-100
pub fn confidence_score(stats: &PixelStats) -> f64 {
    let raw = stats.pixel_density * DENSITY_WEIGHT
        + stats.stroke_density * STROKE_WEIGHT
        + stats.potential_blocks as f64 * BLOCK_WEIGHT
        + stats.max_block_length as f64 * BLOCK_LENGTH_WEIGHT;
    raw.clamp(0.0, MAX_CONFIDENCE)
}

/// Apply the detection thresholds to a region's statistics
pub fn decide(stats: &PixelStats, options: &DetectionOptions) -> SignatureVerdict {
    let enough_ink = stats.pixel_density >= options.min_density;
    let enough_strokes = stats.stroke_density >= options.min_stroke_density;
    let long_stroke =
        stats.max_block_length as u64 >= options.min_signature_width as u64 * 3;
    let stroke_shape = stats.potential_blocks >= options.min_blocks || long_stroke;

    SignatureVerdict {
        detected: enough_ink && enough_strokes && stroke_shape,
        confidence: confidence_score(stats),
        pixel_density: stats.pixel_density,
        stroke_density: stats.stroke_density,
        potential_blocks: stats.potential_blocks,
        max_block_length: stats.max_block_length,
        region: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(pixel_density: f64, stroke_density: f64, blocks: u32, max_len: u32) -> PixelStats {
        PixelStats {
            pixel_density,
            stroke_density,
            potential_blocks: blocks,
            max_block_length: max_len,
        }
    }

    #[test]
    fn test_all_conditions_met() {
        let verdict = decide(&stats(0.05, 0.01, 2, 40), &DetectionOptions::default());
        assert!(verdict.detected);
    }

    #[test]
    fn test_low_density_rejected() {
        let verdict = decide(&stats(0.029, 0.01, 5, 200), &DetectionOptions::default());
        assert!(!verdict.detected);
    }

    #[test]
    fn test_solid_block_rejected() {
        // Lots of ink but hardly any strokes: a rule line or filled box
        let verdict = decide(&stats(0.4, 0.001, 10, 300), &DetectionOptions::default());
        assert!(!verdict.detected);
    }

    #[test]
    fn test_single_long_stroke_accepted() {
        let options = DetectionOptions::default();
        let short = decide(&stats(0.05, 0.01, 1, 89), &options);
        let long = decide(&stats(0.05, 0.01, 1, 90), &options);

        assert!(!short.detected);
        assert!(long.detected);
    }

    #[test]
    fn test_confidence_weights() {
        let s = stats(0.1, 0.02, 2, 50);
        // 12 + 1.2 + 30 + 10
        assert!((confidence_score(&s) - 53.2).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_clamped() {
        let s = stats(0.5, 0.1, 20, 1000);
        assert_eq!(confidence_score(&s), 100.0);
        assert_eq!(confidence_score(&PixelStats::default()), 0.0);
    }

    #[test]
    fn test_verdict_copies_stats() {
        let verdict = decide(&stats(0.04, 0.006, 3, 70), &DetectionOptions::default());
        assert_eq!(verdict.potential_blocks, 3);
        assert_eq!(verdict.max_block_length, 70);
        assert_eq!(verdict.pixel_density, 0.04);
        assert!(verdict.region.is_none());
    }
}
