//! Debug overlays for scanned pages
//!
//! Outlines each barcode (green when signed, red otherwise) and boxes the
//! area that was inspected for a signature.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::raster::RasterBuffer;
use crate::scan::BarcodeSymbol;

const SIGNED: Rgb<u8> = Rgb([0, 255, 136]);
const UNSIGNED: Rgb<u8> = Rgb([255, 0, 0]);
const SEARCH_AREA: Rgb<u8> = Rgb([0, 120, 255]);

/// Draw barcode outlines and search areas onto a copy of `page`
pub fn annotate(page: &RasterBuffer, symbols: &[BarcodeSymbol]) -> RgbImage {
    let mut canvas = page.image().clone();

    for symbol in symbols {
        let colour = if symbol.has_signature == Some(true) {
            SIGNED
        } else {
            UNSIGNED
        };

        if let Some(quad) = &symbol.quad {
            let corners = quad.points();
            for i in 0..corners.len() {
                let a = corners[i];
                let b = corners[(i + 1) % corners.len()];
                draw_line_segment_mut(
                    &mut canvas,
                    (a.x as f32, a.y as f32),
                    (b.x as f32, b.y as f32),
                    colour,
                );
            }
        }

        if let Some(region) = symbol.signature_region {
            let rect = Rect::at(region.x as i32, region.y as i32).of_size(region.width, region.height);
            draw_hollow_rect_mut(&mut canvas, rect, SEARCH_AREA);
        }
    }

    canvas
}
