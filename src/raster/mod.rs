//! Raster buffers for scanned pages and images
//!
//! A [`RasterBuffer`] owns its RGB samples. Sub-regions are always copied out
//! into a fresh buffer with its own origin, so analysis never aliases the page.

use image::{DynamicImage, Rgb, RgbImage};
use tracing::debug;

use crate::error::{Result, ScanError};
use crate::vision::geometry::SignatureRegion;

/// Owned row-major RGB raster (page render or decoded image)
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBuffer {
    pixels: RgbImage,
}

impl RasterBuffer {
    /// Wrap an existing RGB image
    pub fn new(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    /// Create a white page of the given size
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
    }

    /// Create a buffer from tightly packed RGB data
    pub fn from_rgb(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        let actual = data.len();
        RgbImage::from_raw(width, height, data)
            .map(Self::new)
            .ok_or_else(|| {
                ScanError::InvalidRaster(format!(
                    "{}x{} RGB needs {} bytes, got {}",
                    width, height, expected, actual
                ))
            })
    }

    /// Create a buffer from RGBA data (canvas-style). Alpha is dropped.
    pub fn from_rgba(data: &[u8], width: u32, height: u32) -> Result<Self> {
        let rgba = image::RgbaImage::from_raw(width, height, data.to_vec()).ok_or_else(|| {
            ScanError::InvalidRaster(format!(
                "{}x{} RGBA needs {} bytes, got {}",
                width,
                height,
                width as usize * height as usize * 4,
                data.len()
            ))
        })?;

        Ok(Self::from_dynamic(DynamicImage::ImageRgba8(rgba)))
    }

    /// Convert any decoded image into an RGB raster
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::new(image.to_rgb8())
    }

    /// Decode an encoded image file (PNG, JPEG, ...) held in memory.
    ///
    /// Inputs larger than `max_bytes` are refused before decoding.
    pub fn decode(bytes: &[u8], max_bytes: u64) -> Result<Self> {
        let size = bytes.len() as u64;
        if size > max_bytes {
            return Err(ScanError::ImageTooLarge {
                size,
                limit: max_bytes,
            });
        }

        let decoded = image::load_from_memory(bytes)?;
        debug!("Decoded image {}x{}", decoded.width(), decoded.height());
        Ok(Self::from_dynamic(decoded))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Get dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Borrow the underlying image
    pub fn image(&self) -> &RgbImage {
        &self.pixels
    }

    /// Pixel samples in row-major order
    pub fn samples(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.pixels.pixels().map(|p| p.0)
    }

    /// Copy a rectangular window into a new buffer whose origin is the
    /// window's top-left corner. The window is clipped to the buffer.
    pub fn extract(&self, region: &SignatureRegion) -> RasterBuffer {
        let window = image::imageops::crop_imm(
            &self.pixels,
            region.x,
            region.y,
            region.width,
            region.height,
        );
        Self::new(window.to_image())
    }
}

impl From<RgbImage> for RasterBuffer {
    fn from(pixels: RgbImage) -> Self {
        Self::new(pixels)
    }
}
