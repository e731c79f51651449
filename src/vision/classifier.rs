//! Pixel-level ink statistics
//!
//! One pass over a region in flattened row-major order. Dark runs are tracked
//! across row boundaries: a run that ends one row and continues at the start
//! of the next counts as one run.

use serde::{Deserialize, Serialize};

use crate::raster::RasterBuffer;

/// Thresholds shared by the classifier and the decision step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionOptions {
    /// Mean RGB brightness below which a pixel counts as ink (0-255).
    /// Kept high so faint pen strokes on scanned paper still register.
    pub pixel_threshold: f64,
    /// Shortest dark run (in scan order) that counts as a stroke block
    pub min_signature_width: u32,
    /// Minimum fraction of dark pixels
    pub min_density: f64,
    /// Minimum light-to-dark transitions per pixel
    pub min_stroke_density: f64,
    /// Minimum number of stroke blocks
    pub min_blocks: u32,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            pixel_threshold: 200.0,
            min_signature_width: 30,
            min_density: 0.03,
            min_stroke_density: 0.005,
            min_blocks: 2,
        }
    }
}

/// Ink statistics for one region
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelStats {
    /// Dark pixels / total pixels
    pub pixel_density: f64,
    /// Light-to-dark transitions / total pixels
    pub stroke_density: f64,
    /// Dark runs at least `min_signature_width` long
    pub potential_blocks: u32,
    /// Longest qualifying dark run
    pub max_block_length: u32,
}

/// Mean of the R, G and B channels
#[inline]
pub fn brightness(sample: [u8; 3]) -> f64 {
    (sample[0] as u32 + sample[1] as u32 + sample[2] as u32) as f64 / 3.0
}

/// Compute ink statistics for a region. An empty region yields all zeros.
pub fn classify(region: &RasterBuffer, options: &DetectionOptions) -> PixelStats {
    classify_samples(region.samples(), options)
}

/// Same as [`classify`] over any row-major sample sequence
pub fn classify_samples<I>(samples: I, options: &DetectionOptions) -> PixelStats
where
    I: IntoIterator<Item = [u8; 3]>,
{
    let mut total: u64 = 0;
    let mut dark_pixels: u64 = 0;
    let mut stroke_transitions: u64 = 0;
    let mut prev_dark = false;
    let mut current_block: u32 = 0;
    let mut potential_blocks: u32 = 0;
    let mut max_block_length: u32 = 0;

    let mut close_block = |length: u32| {
        if length >= options.min_signature_width {
            potential_blocks += 1;
            max_block_length = max_block_length.max(length);
        }
    };

    for sample in samples {
        total += 1;
        let is_dark = brightness(sample) < options.pixel_threshold;

        if is_dark {
            dark_pixels += 1;
            if !prev_dark {
                stroke_transitions += 1;
            }
            current_block += 1;
        } else {
            close_block(current_block);
            current_block = 0;
        }
        prev_dark = is_dark;
    }

    // Trailing run at the end of the region
    close_block(current_block);

    if total == 0 {
        return PixelStats::default();
    }

    PixelStats {
        pixel_density: dark_pixels as f64 / total as f64,
        stroke_density: stroke_transitions as f64 / total as f64,
        potential_blocks,
        max_block_length,
    }
}
