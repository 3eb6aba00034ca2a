//! Fixed-size cell access for grid sprite sheets

use image::{imageops, Rgba, RgbaImage};

/// Width and height of a hat cell.
pub const HAT_CELL: u32 = 16;
/// Width of a character cell.
pub const CHARACTER_CELL_WIDTH: u32 = 16;
/// Height of a character cell.
pub const CHARACTER_CELL_HEIGHT: u32 = 32;

/// Transparent color used for padding
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A rectangle in sheet pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CellRect {
    /// The rectangle of cell (`col`, `row`) in a grid of `width` x `height` cells.
    pub fn grid(col: u32, row: u32, width: u32, height: u32) -> Self {
        Self {
            x: col * width,
            y: row * height,
            width,
            height,
        }
    }

    /// Whether the rectangle lies entirely inside a `sheet_width` x `sheet_height` image.
    pub fn fits(&self, sheet_width: u32, sheet_height: u32) -> bool {
        self.x + self.width <= sheet_width && self.y + self.height <= sheet_height
    }
}

/// Copy one cell out of a sheet.
///
/// Parts of the rectangle that fall outside the sheet come back transparent,
/// so the result is always `rect.width` x `rect.height`.
pub fn crop_cell(sheet: &RgbaImage, rect: CellRect) -> RgbaImage {
    if rect.fits(sheet.width(), sheet.height()) {
        return imageops::crop_imm(sheet, rect.x, rect.y, rect.width, rect.height).to_image();
    }

    let mut cell = RgbaImage::from_pixel(rect.width, rect.height, TRANSPARENT);
    for y in 0..rect.height {
        for x in 0..rect.width {
            let (sx, sy) = (rect.x + x, rect.y + y);
            if sx < sheet.width() && sy < sheet.height() {
                cell.put_pixel(x, y, *sheet.get_pixel(sx, sy));
            }
        }
    }
    cell
}

/// Flip a cell horizontally, for art drawn facing the other way.
pub fn mirror(cell: &RgbaImage) -> RgbaImage {
    imageops::flip_horizontal(cell)
}
