//! Bitmap font sheets
//!
//! A sheet is a binary PPM holding the 96 printable ASCII glyphs in a 16×6
//! grid, starting at `' '` in the top-left cell. Glyphs are dark ink on a
//! light background; ink darkness becomes coverage so the glyph can be drawn
//! in any palette colour.

use std::path::Path;

use anyhow::{bail, Context, Result};
use image::{GrayImage, ImageFormat};

use super::Frame;

/// Glyph cells per sheet row
pub const SHEET_COLUMNS: u32 = 16;
/// Glyph rows per sheet (`' '..='\x7f'`)
pub const SHEET_ROWS: u32 = 6;

pub struct FontSheet {
    sheet: GrayImage,
    cell_width: u32,
    cell_height: u32,
    /// Scaled cell size in the text row
    glyph_width: usize,
    row_height: usize,
}

impl FontSheet {
    /// Load a PPM sheet scaled to a text row of `row_height` pixels
    pub fn load(path: &Path, row_height: usize) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading font sheet {}", path.display()))?;
        Self::from_bytes(&bytes, row_height)
            .with_context(|| format!("loading font sheet {}", path.display()))
    }

    pub fn from_bytes(bytes: &[u8], row_height: usize) -> Result<Self> {
        let sheet = image::load_from_memory_with_format(bytes, ImageFormat::Pnm)
            .context("decoding PPM")?
            .to_luma8();
        if sheet.width() < SHEET_COLUMNS || sheet.height() < SHEET_ROWS {
            bail!(
                "font sheet is {}x{}, need at least one pixel per glyph cell ({}x{})",
                sheet.width(),
                sheet.height(),
                SHEET_COLUMNS,
                SHEET_ROWS
            );
        }

        let cell_width = sheet.width() / SHEET_COLUMNS;
        let cell_height = sheet.height() / SHEET_ROWS;
        // Keep the cell aspect ratio at the row height
        let glyph_width =
            (cell_width as usize * row_height / cell_height as usize).max(1);

        Ok(Self {
            sheet,
            cell_width,
            cell_height,
            glyph_width,
            row_height,
        })
    }

    pub fn glyph_width(&self) -> usize {
        self.glyph_width
    }

    /// Ink coverage of `unit` at (x, y) inside its scaled cell, nearest-neighbour
    fn coverage(&self, unit: u8, x: usize, y: usize) -> u8 {
        let column = u32::from(unit) % SHEET_COLUMNS;
        let row = u32::from(unit) / SHEET_COLUMNS - 2;
        let sx = column * self.cell_width + (x * self.cell_width as usize / self.glyph_width) as u32;
        let sy = row * self.cell_height + (y * self.cell_height as usize / self.row_height) as u32;
        255 - self.sheet.get_pixel(sx, sy).0[0]
    }

    /// Draw a printable ASCII `unit` whose cell starts at (x, y)
    pub fn draw_unit(&self, frame: &mut Frame, x: usize, y: usize, unit: u8, color: u32) {
        if !(b' '..=b'~').contains(&unit) {
            return;
        }
        for cy in 0..self.row_height {
            for cx in 0..self.glyph_width {
                frame.blend_pixel(x + cx, y + cy, color, self.coverage(unit, cx, cy));
            }
        }
    }
}
