//! Signature detection core
//!
//! Given a page raster and a barcode's corner points, inspects the area to the
//! right of the barcode and decides whether it holds a handwritten signature:
//! - `geometry`: where to look
//! - `classifier`: ink statistics for that area
//! - `decision`: thresholds and confidence score
//!
//! Everything here is synchronous and pure, so it can run on any thread.

pub mod annotate;
pub mod classifier;
pub mod decision;
pub mod geometry;

pub use annotate::annotate;
pub use classifier::{classify, DetectionOptions, PixelStats};
pub use decision::{confidence_score, decide, SignatureVerdict};
pub use geometry::{
    compute_signature_region, BarcodeQuad, BoundingBox, Point2D, RegionOptions, SignatureRegion,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::raster::RasterBuffer;

/// Settings for signature detection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureConfig {
    /// Search-area sizing
    pub region: RegionOptions,
    /// Ink thresholds
    pub detection: DetectionOptions,
}

/// Signature detector bound to one configuration
#[derive(Debug, Clone, Default)]
pub struct SignatureDetector {
    config: SignatureConfig,
}

impl SignatureDetector {
    /// Create a detector with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detector with custom configuration
    pub fn with_config(config: SignatureConfig) -> Self {
        Self { config }
    }

    /// Decide whether a signature sits next to the barcode outlined by
    /// `corners`. Fewer than four usable corners gives `not_detected`.
    pub fn detect(&self, page: &RasterBuffer, corners: &[Point2D]) -> SignatureVerdict {
        let Some(quad) = BarcodeQuad::from_points(corners) else {
            debug!("Barcode corners missing or invalid ({} points)", corners.len());
            return SignatureVerdict::not_detected();
        };
        self.detect_quad(page, &quad)
    }

    /// Same as [`detect`](Self::detect) for an already validated quad
    pub fn detect_quad(&self, page: &RasterBuffer, quad: &BarcodeQuad) -> SignatureVerdict {
        let (width, height) = page.dimensions();
        let Some(region) = compute_signature_region(width, height, quad, &self.config.region)
        else {
            debug!("No signature area fits a {}x{} page", width, height);
            return SignatureVerdict::not_detected();
        };

        let area = page.extract(&region);
        let stats = classify(&area, &self.config.detection);
        let verdict = decide(&stats, &self.config.detection).with_region(region);

        let (min_x, min_y, max_x, max_y) = quad.bounds();
        debug!(
            "Signature analysis: area=({}, {}, {}x{}) barcode={:.0}x{:.0} status={} confidence={:.1}% \
             density={:.4} strokes={:.4} blocks={} max_block={}",
            region.x,
            region.y,
            region.width,
            region.height,
            max_x - min_x,
            max_y - min_y,
            if verdict.detected { "Detected" } else { "None" },
            verdict.confidence,
            verdict.pixel_density,
            verdict.stroke_density,
            verdict.potential_blocks,
            verdict.max_block_length,
        );

        verdict
    }
}

/// Detect a signature with the given configuration
pub fn detect_signature(
    page: &RasterBuffer,
    corners: &[Point2D],
    config: &SignatureConfig,
) -> SignatureVerdict {
    SignatureDetector::with_config(config.clone()).detect(page, corners)
}
