//! Rendering of gap buffer state into raster frames
//!
//! Each frame has two rows:
//!
//! ```text
//!  +---+---+---+---+---+---+---+---+
//!  | T | h | i | s |[ ]|   |   |   |   logical text, cursor cell inverted
//!  +---+---+---+---+---+---+---+---+
//!   ##  ##  ##  ##          ##  ##     one block per occupied storage slot
//! ```
//!
//! The upper row is indexed by logical offset, the lower row by physical
//! slot, so the gap shows up as a run of missing blocks under the cursor.

mod font_sheet;
mod frame;

pub use font_sheet::FontSheet;
pub use frame::{blend_colors, Frame, TextPainter};

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use fontdue::{Font, FontSettings, Metrics};

use crate::config::AnimConfig;
use crate::gap_buffer::GapBuffer;
use crate::theme::Palette;

// Glyph cache key: (character, font_size as bits)
pub type GlyphCacheKey = (char, u32);
pub type GlyphCache = HashMap<GlyphCacheKey, (Metrics, Vec<u8>)>;

/// Fraction of the text row height used as the font's pixel size
const FONT_FILL: f32 = 0.8;

/// Largest frame the renderer will allocate, in pixels
pub const MAX_FRAME_PIXELS: usize = 1 << 25;

/// Font used when the config names none
const BUILTIN_FONT: &[u8] = include_bytes!("../../assets/DejaVuSansMono.ttf");

/// A loaded font plus the metrics the layout needs
pub struct FontInfo {
    font: Font,
    px: f32,
    glyph_width: usize,
    baseline: f32,
}

impl FontInfo {
    /// Load a TrueType/OpenType font sized to fit a text row of `row_height` pixels
    pub fn load(path: &Path, row_height: usize) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading font {}", path.display()))?;
        Self::from_bytes(&bytes, row_height)
            .with_context(|| format!("loading font {}", path.display()))
    }

    /// The embedded DejaVu Sans Mono
    pub fn builtin(row_height: usize) -> Result<Self> {
        Self::from_bytes(BUILTIN_FONT, row_height).context("loading builtin font")
    }

    pub fn from_bytes(bytes: &[u8], row_height: usize) -> Result<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(anyhow::Error::msg)?;

        let px = row_height as f32 * FONT_FILL;
        let line_metrics = font
            .horizontal_line_metrics(px)
            .context("font missing horizontal line metrics")?;
        let glyph_width = font.metrics('M', px).advance_width.ceil().max(1.0) as usize;

        // Center the ascent..descent band vertically in the row
        let band = line_metrics.ascent - line_metrics.descent;
        let baseline = (row_height as f32 - band) / 2.0 + line_metrics.ascent;

        Ok(Self {
            font,
            px,
            glyph_width,
            baseline,
        })
    }
}

/// Where text-row glyphs come from
pub enum Glyphs {
    /// TrueType/OpenType outlines rasterised by fontdue
    Outline(FontInfo),
    /// PPM bitmap sheet
    Sheet(FontSheet),
}

impl Glyphs {
    /// Load a font file; `.ppm` files are read as bitmap sheets
    pub fn load(path: &Path, row_height: usize) -> Result<Self> {
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("ppm")) {
            Ok(Self::Sheet(FontSheet::load(path, row_height)?))
        } else {
            Ok(Self::Outline(FontInfo::load(path, row_height)?))
        }
    }

    fn glyph_width(&self) -> usize {
        match self {
            Self::Outline(info) => info.glyph_width,
            Self::Sheet(sheet) => sheet.glyph_width(),
        }
    }
}

/// Owned RGB frame produced by the [`Renderer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    /// ARGB pixels, row-major
    pub pixels: Vec<u32>,
}

impl Canvas {
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    /// Pack as tightly interleaved RGB8 bytes
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixels.len() * 3);
        for &pixel in &self.pixels {
            rgb.push(((pixel >> 16) & 0xFF) as u8);
            rgb.push(((pixel >> 8) & 0xFF) as u8);
            rgb.push((pixel & 0xFF) as u8);
        }
        rgb
    }
}

/// Draws buffer state; keeps its glyph cache across frames
pub struct Renderer {
    palette: Palette,
    cell_size: usize,
    row_height: usize,
    glyphs: Option<Glyphs>,
    glyph_cache: GlyphCache,
}

impl Renderer {
    /// Renderer without a font: glyphs are drawn as placeholder bars
    pub fn new(palette: Palette, cell_size: usize, row_height: usize) -> Self {
        Self {
            palette,
            cell_size,
            row_height,
            glyphs: None,
            glyph_cache: HashMap::new(),
        }
    }

    /// Build from config: the configured font, or the builtin one
    pub fn from_config(config: &AnimConfig, palette: Palette) -> Result<Self> {
        let glyphs = match &config.font {
            Some(path) => {
                tracing::info!("Using font {}", path.display());
                Glyphs::load(path, config.font_size)?
            }
            None => Glyphs::Outline(FontInfo::builtin(config.font_size)?),
        };
        Ok(Self::new(palette, config.cell_size, config.font_size).with_glyphs(glyphs))
    }

    pub fn with_glyphs(mut self, glyphs: Glyphs) -> Self {
        self.glyphs = Some(glyphs);
        self.glyph_cache.clear();
        self
    }

    /// Width of one cell in the text row
    pub fn glyph_width(&self) -> usize {
        self.glyphs
            .as_ref()
            .map_or(self.row_height / 2, Glyphs::glyph_width)
    }

    /// Pixel size of the frame for `buffer`, refusing frames over [`MAX_FRAME_PIXELS`]
    pub fn frame_size(&self, buffer: &GapBuffer) -> Result<(usize, usize)> {
        let too_large = || {
            anyhow::anyhow!(
                "frame for capacity {} does not fit in memory",
                buffer.capacity()
            )
        };
        let blocks = buffer
            .capacity()
            .checked_mul(self.cell_size)
            .ok_or_else(too_large)?;
        // One extra cell so the cursor stays visible at end of content
        let text = (buffer.len() + 1)
            .checked_mul(self.glyph_width())
            .ok_or_else(too_large)?;
        let width = blocks.max(text);
        let height = self
            .row_height
            .checked_add(self.cell_size)
            .ok_or_else(too_large)?;

        match width.checked_mul(height) {
            Some(pixels) if pixels <= MAX_FRAME_PIXELS => Ok((width, height)),
            _ => bail!(
                "{}x{} frame for capacity {} exceeds the {} pixel limit",
                width,
                height,
                buffer.capacity(),
                MAX_FRAME_PIXELS
            ),
        }
    }

    pub fn render(&mut self, buffer: &GapBuffer) -> Result<Canvas> {
        let (width, height) = self.frame_size(buffer)?;
        let background = self.palette.background.to_argb_u32();
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(width * height)
            .with_context(|| format!("allocating {}x{} frame", width, height))?;
        pixels.resize(width * height, 0);

        {
            let mut frame = Frame::new(&mut pixels, width, height);
            frame.clear(background);
            let cursor = buffer.cursor();

            for cell in buffer.cells() {
                self.draw_block(&mut frame, cell.physical);
                self.draw_unit(&mut frame, cell.logical, cell.unit, cell.logical == cursor);
            }
            if buffer.back_len() == 0 {
                self.draw_unit(&mut frame, cursor, b' ', true);
            }
        }

        Ok(Canvas {
            width,
            height,
            pixels,
        })
    }

    /// Block for one occupied storage slot, inset by 1/8 cell on each side
    fn draw_block(&self, frame: &mut Frame, slot: usize) {
        let inset = self.cell_size / 8;
        let size = self.cell_size - 2 * inset;
        frame.fill_rect_px(
            slot * self.cell_size + inset,
            self.row_height + inset,
            size,
            size,
            self.palette.block.to_argb_u32(),
        );
    }

    /// One text cell; the cursor cell swaps foreground and background
    fn draw_unit(&mut self, frame: &mut Frame, logical: usize, unit: u8, inverted: bool) {
        let glyph_width = self.glyph_width();
        let x = logical * glyph_width;
        let (fg, bg) = if inverted {
            (self.palette.background, self.palette.text)
        } else {
            (self.palette.text, self.palette.background)
        };
        if inverted {
            frame.fill_rect_px(x, 0, glyph_width, self.row_height, bg.to_argb_u32());
        }

        let ch = if unit.is_ascii_graphic() { unit as char } else { ' ' };
        if ch == ' ' {
            return;
        }

        match &self.glyphs {
            Some(Glyphs::Outline(info)) => {
                let mut painter =
                    TextPainter::new(&info.font, &mut self.glyph_cache, info.px, info.baseline);
                painter.draw_char(frame, x, 0, ch, fg.to_argb_u32());
            }
            Some(Glyphs::Sheet(sheet)) => {
                sheet.draw_unit(frame, x, 0, unit, fg.to_argb_u32());
            }
            None => {
                // Placeholder bar in the lower half of the cell
                let margin = (glyph_width / 6).max(1);
                frame.fill_rect_px(
                    x + margin,
                    self.row_height / 2,
                    glyph_width.saturating_sub(2 * margin),
                    self.row_height / 3,
                    fg.to_argb_u32(),
                );
            }
        }
    }
}
