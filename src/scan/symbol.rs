//! Barcode symbols as seen by the scanner
//!
//! [`EngineDetection`] mirrors the loosely-shaped output of an external
//! barcode engine. [`BarcodeSymbol`] is the validated form the rest of the
//! crate works with.

use serde::{Deserialize, Serialize};

use crate::vision::{BarcodeQuad, BoundingBox, Point2D, SignatureVerdict, SignatureRegion};

/// One raw result from a barcode engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineDetection {
    /// Decoded text
    pub text: String,
    /// Symbology tag, e.g. "CODE_39"
    #[serde(default)]
    pub format: String,
    /// Localization confidence (0-100)
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Corner points; engines report either none or four
    #[serde(default)]
    pub quad_points: Vec<Point2D>,
    /// Axis-aligned fallback when corners are missing
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
}

impl EngineDetection {
    pub fn new(text: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: format.into(),
            ..Default::default()
        }
    }

    /// Corner quad, synthesized from the bounding box when fewer than four
    /// corner points were reported
    pub fn quad(&self) -> Option<BarcodeQuad> {
        BarcodeQuad::from_points(&self.quad_points).or_else(|| {
            let fallback = self.bounding_box?.to_quad();
            BarcodeQuad::from_points(fallback.points())
        })
    }
}

/// A decoded barcode with its geometry and, once classified, its signature verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeSymbol {
    pub text: String,
    pub format: String,
    /// Engine localization confidence (0-100)
    pub confidence: f64,
    /// `None` when the engine gave no usable corners or box
    pub quad: Option<BarcodeQuad>,
    pub center: Point2D,
    /// 1-based page number (PDF input only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    pub has_signature: Option<bool>,
    pub signature_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_region: Option<SignatureRegion>,
}

impl BarcodeSymbol {
    /// Validate engine output into a symbol
    pub fn from_detection(detection: EngineDetection, page: Option<u32>) -> Self {
        let quad = detection.quad();
        let center = match &quad {
            Some(quad) => quad.center(),
            None => mean_point(&detection.quad_points),
        };

        Self {
            confidence: detection.confidence.unwrap_or(0.0).clamp(0.0, 100.0),
            text: detection.text,
            format: detection.format,
            quad,
            center,
            page,
            has_signature: None,
            signature_confidence: None,
            signature_region: None,
        }
    }

    /// Record a signature verdict on this symbol
    pub fn attach_verdict(&mut self, verdict: &SignatureVerdict) {
        self.has_signature = Some(verdict.detected);
        self.signature_confidence = Some(verdict.confidence);
        self.signature_region = verdict.region;
    }

    /// True only once classified as signed
    pub fn is_signed(&self) -> bool {
        self.has_signature.unwrap_or(false)
    }
}

/// Mean of the finite points, or the origin when there are none
fn mean_point(points: &[Point2D]) -> Point2D {
    let finite: Vec<&Point2D> = points.iter().filter(|p| p.is_finite()).collect();
    if finite.is_empty() {
        return Point2D::default();
    }
    let n = finite.len() as f64;
    let (sx, sy) = finite.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point2D::new(sx / n, sy / n)
}
