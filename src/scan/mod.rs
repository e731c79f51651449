//! Barcode / signature pairing
//!
//! Attaches a signature verdict to every barcode found on a page, orders the
//! barcodes the way a person reads the document, and drives whole batches of
//! files through the external engine and renderer.

pub mod batch;
pub mod engine;
pub mod ordering;
pub mod symbol;

pub use batch::{BatchOutcome, BatchProgress, BatchScanner, ProgressCallback, ScanInput};
pub use engine::{BarcodeEngine, DecodeContext, PageRenderer};
pub use ordering::{reading_order, sort_symbols, OrderingOptions};
pub use symbol::{BarcodeSymbol, EngineDetection};

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::raster::RasterBuffer;
use crate::vision::{SignatureConfig, SignatureDetector, SignatureVerdict};

/// Kind of file a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Image,
    Pdf,
}

impl FileKind {
    /// Guess from the file extension; anything that is not `.pdf` is an image
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => FileKind::Pdf,
            _ => FileKind::Image,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Image => write!(f, "image"),
            FileKind::Pdf => write!(f, "application/pdf"),
        }
    }
}

/// Settings for one scan run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    pub signature: SignatureConfig,
    pub ordering: OrderingOptions,
    /// PDF render scale; higher resolves thinner strokes at linear pixel cost
    pub render_scale: f32,
    /// Largest encoded image or PDF accepted, in bytes
    pub max_image_bytes: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            signature: SignatureConfig::default(),
            ordering: OrderingOptions::default(),
            render_scale: 5.0,
            max_image_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Barcodes and signature verdicts for one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub file_name: String,
    pub file_type: FileKind,
    /// Symbols in reading order
    pub symbols: Vec<BarcodeSymbol>,
    /// True when any symbol is signed
    pub signature: bool,
    /// Why the file could not be scanned
    pub error: Option<String>,
}

impl ScanResult {
    /// Empty result at the start of scanning a file
    pub fn new(file_name: impl Into<String>, file_type: FileKind) -> Self {
        Self {
            file_name: file_name.into(),
            file_type,
            symbols: Vec::new(),
            signature: false,
            error: None,
        }
    }

    /// Result for a file that failed; any partial symbols are dropped
    pub fn failed(mut self, error: impl fmt::Display) -> Self {
        self.symbols.clear();
        self.signature = false;
        self.error = Some(error.to_string());
        self
    }

    /// Sort symbols and compute the document-level signature flag
    pub fn finalize(mut self, ordering: &OrderingOptions) -> Self {
        sort_symbols(&mut self.symbols, ordering);
        self.signature = self.symbols.iter().any(BarcodeSymbol::is_signed);
        self
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Classify every symbol on one page in place, in detection order.
/// Symbols without usable geometry are marked unsigned.
pub fn attach_verdicts(page: &RasterBuffer, symbols: &mut [BarcodeSymbol], detector: &SignatureDetector) {
    for symbol in symbols.iter_mut() {
        let verdict = match &symbol.quad {
            Some(quad) => detector.detect_quad(page, quad),
            None => SignatureVerdict::not_detected(),
        };
        symbol.attach_verdict(&verdict);
    }
}

/// Classify the symbols found on `page` and return them in reading order
pub fn classify_signatures(
    page: &RasterBuffer,
    mut symbols: Vec<BarcodeSymbol>,
    options: &ScanOptions,
) -> Vec<BarcodeSymbol> {
    let detector = SignatureDetector::with_config(options.signature.clone());
    attach_verdicts(page, &mut symbols, &detector);
    sort_symbols(&mut symbols, &options.ordering);
    symbols
}
