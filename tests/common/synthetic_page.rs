use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use sigscan::vision::BoundingBox;
use sigscan::RasterBuffer;

pub const PAGE_WIDTH: u32 = 2000;
pub const PAGE_HEIGHT: u32 = 1500;

const INK: Rgb<u8> = Rgb([20, 20, 20]);

/// Barcode printed at (100,100)-(300,150)
pub fn barcode_box() -> BoundingBox {
    BoundingBox {
        x1: 100.0,
        y1: 100.0,
        x2: 300.0,
        y2: 150.0,
    }
}

/// White page with barcode bars inside [`barcode_box`]
pub fn blank_page_with_barcode() -> RgbImage {
    let mut page = RgbImage::from_pixel(PAGE_WIDTH, PAGE_HEIGHT, Rgb([255, 255, 255]));
    for bar in 0..20 {
        let x = 100 + bar * 10;
        draw_filled_rect_mut(&mut page, Rect::at(x, 100).of_size(4, 50), INK);
    }
    page
}

/// Page whose signature area holds a pen-like scribble.
///
/// Inside (400,90)-(700,200) every even row carries 3 px dashes and two odd
/// rows carry a solid 150 px stroke from x=450.
pub fn signed_page() -> RgbImage {
    let mut page = blank_page_with_barcode();
    for y in (90..200).step_by(2) {
        for x in 400..700u32 {
            if ((x - 400) / 3) % 2 == 0 {
                page.put_pixel(x, y, INK);
            }
        }
    }
    for y in [131, 161] {
        draw_filled_rect_mut(&mut page, Rect::at(450, y).of_size(150, 1), INK);
    }
    page
}

pub fn raster(page: RgbImage) -> RasterBuffer {
    RasterBuffer::new(page)
}
