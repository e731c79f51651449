//! Error types for the scanning pipeline
//!
//! Only failures of the external collaborators (barcode engine, page renderer,
//! image decoding) are errors. Bad barcode geometry and empty search regions
//! are ordinary "no signature" outcomes and never surface here.

use thiserror::Error;

/// Errors raised while scanning a single file
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Barcode engine failed: {0}")]
    Engine(String),

    #[error("Page rendering failed: {0}")]
    Render(String),

    #[error("No page renderer available for PDF input")]
    NoRenderer,

    #[error("Image load failed: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("File size {size} bytes exceeds {limit} byte limit")]
    ImageTooLarge { size: u64, limit: u64 },

    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed detection data: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = ScanError> = std::result::Result<T, E>;
