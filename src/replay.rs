//! Recorded barcode engine output
//!
//! [`ReplayEngine`] answers decode calls from a JSON recording of an external
//! engine's results, keyed by file name and page:
//!
//! ```json
//! {
//!   "invoice.png": [ { "detections": [ { "text": "INV-1", "format": "CODE_39", "quadPoints": [...] } ] } ],
//!   "batch.pdf":   [ { "page": 2, "detections": [ ... ] } ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::raster::RasterBuffer;
use crate::scan::{BarcodeEngine, DecodeContext, EngineDetection};

/// Detections recorded for one page (or the single page of an image)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageDetections {
    /// 1-based page; omitted for images
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub detections: Vec<EngineDetection>,
}

/// Barcode engine that replays recorded detections
#[derive(Debug, Clone, Default)]
pub struct ReplayEngine {
    recordings: HashMap<String, Vec<PageDetections>>,
}

impl ReplayEngine {
    pub fn new(recordings: HashMap<String, Vec<PageDetections>>) -> Self {
        Self { recordings }
    }

    /// Parse a recording from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Load a recording from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let engine = Self::from_json(&content)?;
        info!(
            "Loaded detections for {} files from {:?}",
            engine.recordings.len(),
            path
        );
        Ok(engine)
    }

    /// Number of files with recorded detections
    pub fn file_count(&self) -> usize {
        self.recordings.len()
    }

    fn lookup(&self, file_name: &str, page: Option<u32>) -> Vec<EngineDetection> {
        self.recordings
            .get(file_name)
            .into_iter()
            .flatten()
            .filter(|p| p.page.unwrap_or(1) == page.unwrap_or(1))
            .flat_map(|p| p.detections.iter().cloned())
            .collect()
    }
}

#[async_trait]
impl BarcodeEngine for ReplayEngine {
    async fn decode(
        &mut self,
        context: DecodeContext<'_>,
        image: &RasterBuffer,
    ) -> Result<Vec<EngineDetection>> {
        let detections = self.lookup(context.file_name, context.page);
        debug!(
            "Replaying {} detections for {} page {:?} ({}x{})",
            detections.len(),
            context.file_name,
            context.page,
            image.width(),
            image.height()
        );
        Ok(detections)
    }
}
