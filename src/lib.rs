//! Barcode signature scanner
//!
//! Decides, for each barcode found on a scanned document, whether a
//! handwritten signature sits next to it. Detection is a deterministic
//! brightness heuristic over the area to the right of the barcode; barcode
//! decoding and PDF rasterization are supplied by external engines through
//! the [`scan::BarcodeEngine`] and [`scan::PageRenderer`] traits.

pub mod config;
pub mod error;
pub mod export;
pub mod raster;
pub mod replay;
pub mod scan;
pub mod vision;

pub use error::ScanError;
pub use raster::RasterBuffer;
pub use scan::{
    classify_signatures, BarcodeSymbol, BatchOutcome, BatchScanner, EngineDetection, ScanInput,
    ScanOptions, ScanResult,
};
pub use vision::{detect_signature, Point2D, SignatureConfig, SignatureDetector, SignatureVerdict};
