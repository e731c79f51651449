//! Sequential batch driver
//!
//! Files, and the pages inside a PDF, are processed strictly one at a time:
//! the engine and renderer are single stateful instances and every call into
//! them is awaited before anything else happens. A file that fails is recorded
//! with its error and the batch moves on.

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::engine::{BarcodeEngine, DecodeContext, PageRenderer};
use super::{attach_verdicts, BarcodeSymbol, FileKind, ScanOptions, ScanResult};
use crate::error::{Result, ScanError};
use crate::raster::RasterBuffer;
use crate::vision::SignatureDetector;

/// One file submitted for scanning
#[derive(Debug, Clone)]
pub enum ScanInput {
    /// Image that is already decoded
    Raster { name: String, image: RasterBuffer },
    /// Encoded image file (PNG, JPEG, ...)
    Image { name: String, bytes: Vec<u8> },
    /// PDF document, rasterized page by page
    Pdf { name: String, bytes: Vec<u8> },
    /// Image or PDF file on disk
    File { name: String, path: PathBuf },
}

impl ScanInput {
    /// File on disk, read when its turn comes; image or PDF by extension
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        ScanInput::File { name, path }
    }

    pub fn name(&self) -> &str {
        match self {
            ScanInput::Raster { name, .. }
            | ScanInput::Image { name, .. }
            | ScanInput::Pdf { name, .. }
            | ScanInput::File { name, .. } => name,
        }
    }

    pub fn kind(&self) -> FileKind {
        match self {
            ScanInput::Raster { .. } | ScanInput::Image { .. } => FileKind::Image,
            ScanInput::Pdf { .. } => FileKind::Pdf,
            ScanInput::File { path, .. } => FileKind::from_path(path),
        }
    }
}

/// Progress event, sent before each file, before each PDF page, and once at the end
#[derive(Debug, Clone, PartialEq)]
pub struct BatchProgress {
    /// 0-based index of the file being scanned
    pub file_index: usize,
    pub file_count: usize,
    pub file_name: String,
    /// (page, page count) while rendering a PDF
    pub page: Option<(u32, u32)>,
    /// Overall completion (0-100)
    pub percent: f32,
}

/// Progress callback
pub type ProgressCallback = Box<dyn FnMut(&BatchProgress) + Send>;

/// Result of a batch run
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// No files were submitted
    NothingToDo,
    /// One result per scanned file, in submission order
    Scanned {
        results: Vec<ScanResult>,
        /// True when the batch was stopped before every file was scanned
        cancelled: bool,
    },
}

impl BatchOutcome {
    pub fn results(&self) -> &[ScanResult] {
        match self {
            BatchOutcome::NothingToDo => &[],
            BatchOutcome::Scanned { results, .. } => results,
        }
    }

    pub fn into_results(self) -> Vec<ScanResult> {
        match self {
            BatchOutcome::NothingToDo => Vec::new(),
            BatchOutcome::Scanned { results, .. } => results,
        }
    }

    pub fn was_cancelled(&self) -> bool {
        matches!(self, BatchOutcome::Scanned { cancelled: true, .. })
    }
}

/// Scans batches of files for barcodes and their signatures
pub struct BatchScanner {
    engine: Box<dyn BarcodeEngine>,
    renderer: Option<Box<dyn PageRenderer>>,
    options: ScanOptions,
    detector: SignatureDetector,
    progress: Option<ProgressCallback>,
    cancel: CancellationToken,
}

impl BatchScanner {
    /// Create a scanner around a barcode engine. PDFs need a renderer too.
    pub fn new(engine: Box<dyn BarcodeEngine>, options: ScanOptions) -> Self {
        let detector = SignatureDetector::with_config(options.signature.clone());
        Self {
            engine,
            renderer: None,
            options,
            detector,
            progress: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Attach a PDF page renderer
    pub fn with_renderer(mut self, renderer: Box<dyn PageRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Receive progress events
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Stop the batch from outside; checked before each file
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops this scanner before its next file
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Scan every input in order
    pub async fn scan_batch(&mut self, inputs: Vec<ScanInput>) -> BatchOutcome {
        if inputs.is_empty() {
            info!("No files to scan");
            return BatchOutcome::NothingToDo;
        }

        let file_count = inputs.len();
        let mut results = Vec::with_capacity(file_count);

        for (file_index, input) in inputs.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!(
                    "Batch cancelled after {} of {} files",
                    file_index, file_count
                );
                return BatchOutcome::Scanned {
                    results,
                    cancelled: true,
                };
            }

            report(
                &mut self.progress,
                BatchProgress {
                    file_index,
                    file_count,
                    file_name: input.name().to_string(),
                    page: None,
                    percent: file_index as f32 / file_count as f32 * 100.0,
                },
            );

            results.push(self.scan_file(file_index, file_count, input).await);
        }

        if let Some(last) = results.last() {
            report(
                &mut self.progress,
                BatchProgress {
                    file_index: file_count - 1,
                    file_count,
                    file_name: last.file_name.clone(),
                    page: None,
                    percent: 100.0,
                },
            );
        }

        BatchOutcome::Scanned {
            results,
            cancelled: false,
        }
    }

    /// Scan one file. Failures end up in the result's `error`.
    async fn scan_file(&mut self, file_index: usize, file_count: usize, input: ScanInput) -> ScanResult {
        let result = ScanResult::new(input.name(), input.kind());
        info!("Processing {} of {}: {}", file_index + 1, file_count, input.name());

        let scanned = match &input {
            ScanInput::Raster { name, image } => self.scan_page(name, None, image).await,
            ScanInput::Image { name, bytes } => self.scan_image(name, bytes).await,
            ScanInput::Pdf { name, bytes } => {
                self.scan_pdf(file_index, file_count, name, bytes).await
            }
            ScanInput::File { name, path } => match tokio::fs::read(path).await {
                Ok(bytes) => match FileKind::from_path(path) {
                    FileKind::Pdf => self.scan_pdf(file_index, file_count, name, &bytes).await,
                    FileKind::Image => self.scan_image(name, &bytes).await,
                },
                Err(err) => Err(err.into()),
            },
        };

        match scanned {
            Ok(symbols) => {
                let mut result = result;
                result.symbols = symbols;
                let result = result.finalize(&self.options.ordering);
                info!(
                    "{}: {} barcodes, signature {}",
                    result.file_name,
                    result.symbols.len(),
                    if result.signature { "detected" } else { "not detected" }
                );
                result
            }
            Err(err) => {
                warn!("Error processing {}: {}", input.name(), err);
                result.failed(err)
            }
        }
    }

    async fn scan_image(&mut self, name: &str, bytes: &[u8]) -> Result<Vec<BarcodeSymbol>> {
        let image = RasterBuffer::decode(bytes, self.options.max_image_bytes)?;
        self.scan_page(name, None, &image).await
    }

    async fn scan_pdf(
        &mut self,
        file_index: usize,
        file_count: usize,
        name: &str,
        document: &[u8],
    ) -> Result<Vec<BarcodeSymbol>> {
        let size = document.len() as u64;
        if size > self.options.max_image_bytes {
            return Err(ScanError::ImageTooLarge {
                size,
                limit: self.options.max_image_bytes,
            });
        }

        let scale = self.options.render_scale;
        let page_count = self
            .renderer
            .as_mut()
            .ok_or(ScanError::NoRenderer)?
            .page_count(document)
            .await?;
        debug!("{}: {} pages", name, page_count);

        let mut symbols = Vec::new();
        for page in 1..=page_count {
            let page_fraction = (page - 1) as f32 / page_count as f32;
            report(
                &mut self.progress,
                BatchProgress {
                    file_index,
                    file_count,
                    file_name: name.to_string(),
                    page: Some((page, page_count)),
                    percent: (file_index as f32 + page_fraction) / file_count as f32 * 100.0,
                },
            );

            let image = self
                .renderer
                .as_mut()
                .ok_or(ScanError::NoRenderer)?
                .render(document, page, scale)
                .await?;
            symbols.extend(self.scan_page(name, Some(page), &image).await?);
        }

        Ok(symbols)
    }

    /// Decode one raster and classify every barcode on it
    async fn scan_page(
        &mut self,
        name: &str,
        page: Option<u32>,
        image: &RasterBuffer,
    ) -> Result<Vec<BarcodeSymbol>> {
        let context = DecodeContext {
            file_name: name,
            page,
        };
        let detections = self.engine.decode(context, image).await?;
        debug!(
            "{} page {:?}: engine returned {} barcodes",
            name,
            page,
            detections.len()
        );

        let mut symbols: Vec<BarcodeSymbol> = detections
            .into_iter()
            .map(|detection| BarcodeSymbol::from_detection(detection, page))
            .collect();
        attach_verdicts(image, &mut symbols, &self.detector);
        Ok(symbols)
    }
}

fn report(progress: &mut Option<ProgressCallback>, event: BatchProgress) {
    if let Some(callback) = progress.as_mut() {
        callback(&event);
    }
}
