//! External collaborators: barcode engine and PDF page renderer
//!
//! Both are stateful single-instance resources. The batch driver holds one of
//! each and awaits every call before doing anything else.

use async_trait::async_trait;

use super::EngineDetection;
use crate::error::Result;
use crate::raster::RasterBuffer;

/// Where an image handed to the engine came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeContext<'a> {
    /// Name of the file being scanned
    pub file_name: &'a str,
    /// 1-based page number for PDF input
    pub page: Option<u32>,
}

/// Barcode localization and decoding
#[async_trait]
pub trait BarcodeEngine: Send {
    /// Find and decode every barcode in `image`
    async fn decode(
        &mut self,
        context: DecodeContext<'_>,
        image: &RasterBuffer,
    ) -> Result<Vec<EngineDetection>>;
}

/// PDF rasterization
#[async_trait]
pub trait PageRenderer: Send {
    /// Number of pages in the document
    async fn page_count(&mut self, document: &[u8]) -> Result<u32>;

    /// Render 1-based `page` at `scale` times its nominal size
    async fn render(&mut self, document: &[u8], page: u32, scale: f32) -> Result<RasterBuffer>;
}
