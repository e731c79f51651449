//! Signature search-area geometry
//!
//! Derives the rectangle to the right of a barcode that is inspected for
//! handwritten ink. The rectangle scales with the barcode but has generous
//! minimums, and is always clipped to the page.

use serde::{Deserialize, Serialize};

/// Point in image pixel coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box reported by engines that do not supply corner points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Corners in (x1,y1), (x2,y1), (x2,y2), (x1,y2) order
    pub fn to_quad(&self) -> BarcodeQuad {
        BarcodeQuad::new([
            Point2D::new(self.x1, self.y1),
            Point2D::new(self.x2, self.y1),
            Point2D::new(self.x2, self.y2),
            Point2D::new(self.x1, self.y2),
        ])
    }
}

/// Bounding quadrilateral of a barcode symbol (always four corners)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarcodeQuad([Point2D; 4]);

impl BarcodeQuad {
    pub fn new(points: [Point2D; 4]) -> Self {
        Self(points)
    }

    /// Build a quad from engine corner points.
    ///
    /// Returns `None` for fewer than four points or non-finite coordinates.
    /// Points past the fourth are ignored.
    pub fn from_points(points: &[Point2D]) -> Option<Self> {
        let corners: [Point2D; 4] = points.get(..4)?.try_into().ok()?;
        if !corners.iter().all(Point2D::is_finite) {
            return None;
        }
        Some(Self(corners))
    }

    pub fn points(&self) -> &[Point2D; 4] {
        &self.0
    }

    /// Arithmetic mean of the four corners
    pub fn center(&self) -> Point2D {
        let (sx, sy) = self
            .0
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point2D::new(sx / 4.0, sy / 4.0)
    }

    /// Axis-aligned bounds as (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.0.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(min_x, min_y, max_x, max_y), p| {
                (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
            },
        )
    }
}

/// Pixel rectangle inside a raster, never empty and never past its edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SignatureRegion {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Sizing rules for the signature search area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionOptions {
    /// Narrowest search area (px)
    pub min_width: f64,
    /// Search width as a multiple of barcode width
    pub width_factor: f64,
    /// Horizontal gap after the barcode, as a multiple of barcode width
    pub gap_factor: f64,
    /// Shortest search area (px)
    pub min_height: f64,
    /// Search height as a multiple of barcode height
    pub height_factor: f64,
    /// Cap on search height as a fraction of page height
    pub max_page_height_fraction: f64,
    /// Upward shift of the area's top edge, as a multiple of barcode height
    pub upward_offset_factor: f64,
}

impl Default for RegionOptions {
    fn default() -> Self {
        Self {
            min_width: 450.0,
            width_factor: 2.0,
            gap_factor: 0.7,
            min_height: 100.0,
            height_factor: 7.0,
            max_page_height_fraction: 0.3,
            upward_offset_factor: 0.2,
        }
    }
}

/// Compute the area to inspect for a signature next to `quad` on a
/// `width` x `height` raster.
///
/// Returns `None` when no non-empty area fits (zero-sized raster or
/// non-finite geometry).
pub fn compute_signature_region(
    width: u32,
    height: u32,
    quad: &BarcodeQuad,
    options: &RegionOptions,
) -> Option<SignatureRegion> {
    if width == 0 || height == 0 || !quad.points().iter().all(Point2D::is_finite) {
        return None;
    }

    let page_w = width as f64;
    let page_h = height as f64;

    let (min_x, min_y, max_x, max_y) = quad.bounds();
    let min_x = min_x.clamp(0.0, page_w);
    let max_x = max_x.clamp(0.0, page_w);
    let min_y = min_y.clamp(0.0, page_h);
    let max_y = max_y.clamp(0.0, page_h);

    let barcode_w = (max_x - min_x).max(1.0);
    let barcode_h = (max_y - min_y).max(1.0);

    let area_w = page_w.min((barcode_w * options.width_factor).max(options.min_width));
    let area_x = (page_w - area_w).min((max_x + barcode_w * options.gap_factor).max(0.0));

    let area_h = (barcode_h * options.height_factor)
        .min(page_h * options.max_page_height_fraction)
        .max(options.min_height);
    let area_y = (min_y - barcode_h * options.upward_offset_factor)
        .min(page_h - area_h)
        .max(0.0);

    if !(area_w > 0.0 && area_h > 0.0) {
        return None;
    }

    // Snap to whole pixels, then clip: the minimum height can exceed short pages
    let x = (area_x.floor() as u32).min(width - 1);
    let y = (area_y.floor() as u32).min(height - 1);
    let w = (area_w.floor() as u32).max(1).min(width - x);
    let h = (area_h.floor() as u32).max(1).min(height - y);

    Some(SignatureRegion {
        x,
        y,
        width: w,
        height: h,
    })
}
