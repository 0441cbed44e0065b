//! Palettes for rendered frames
//!
//! A palette is three colours: the frame background, the storage-slot blocks
//! and the glyphs. Built-in palettes are embedded at compile time; custom
//! palettes are YAML files with the same shape.
//!
//! Palette loading priority:
//! 1. Explicit file path
//! 2. User config: `~/.config/gapvis/palettes/{id}.yaml`
//! 3. Embedded: Built-in palettes compiled into binary

use std::path::Path;

use serde::Deserialize;

pub const PAPER_YAML: &str = include_str!("../palettes/paper.yaml");
pub const SLATE_YAML: &str = include_str!("../palettes/slate.yaml");

/// A built-in palette entry
pub struct BuiltinPalette {
    pub id: &'static str,
    pub yaml: &'static str,
}

/// Registry of all built-in palettes
pub const BUILTIN_PALETTES: &[BuiltinPalette] = &[
    BuiltinPalette {
        id: "paper",
        yaml: PAPER_YAML,
    },
    BuiltinPalette {
        id: "slate",
        yaml: SLATE_YAML,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to opaque ARGB u32 for the frame buffer
    pub fn to_argb_u32(&self) -> u32 {
        0xFF000000 | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Parse from "#RRGGBB"
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let hex = s.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("Invalid color format: {}", s));
        }
        Ok(Color {
            r: u8::from_str_radix(&hex[0..2], 16).map_err(|e| e.to_string())?,
            g: u8::from_str_radix(&hex[2..4], 16).map_err(|e| e.to_string())?,
            b: u8::from_str_radix(&hex[4..6], 16).map_err(|e| e.to_string())?,
        })
    }
}

/// Raw palette data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteData {
    pub version: u32,
    pub name: String,
    pub background: String,
    pub block: String,
    pub text: String,
}

/// Resolved palette used by the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub name: String,
    pub background: Color,
    pub block: Color,
    pub text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::paper()
    }
}

impl Palette {
    /// White background, grey blocks, black glyphs
    pub fn paper() -> Self {
        Self {
            name: "Paper".to_string(),
            background: Color::rgb(0xFF, 0xFF, 0xFF),
            block: Color::rgb(0x7F, 0x7F, 0x7F),
            text: Color::rgb(0x00, 0x00, 0x00),
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let data: PaletteData =
            serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse palette: {}", e))?;
        if data.version != 1 {
            return Err(format!("Unsupported palette version: {}", data.version));
        }
        Ok(Self {
            name: data.name,
            background: Color::from_hex(&data.background)?,
            block: Color::from_hex(&data.block)?,
            text: Color::from_hex(&data.text)?,
        })
    }

    pub fn from_builtin(id: &str) -> Result<Self, String> {
        BUILTIN_PALETTES
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| format!("Unknown builtin palette: {}", id))
            .and_then(|p| Self::from_yaml(p.yaml))
    }
}

/// Load a palette from a YAML file
pub fn from_file(path: &Path) -> Result<Palette, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read palette file {}: {}", path.display(), e))?;
    Palette::from_yaml(&content)
}

/// Load a palette by id or path with priority: path → user → builtin
pub fn load_palette(reference: &str) -> Result<Palette, String> {
    let path = Path::new(reference);
    if path.extension().is_some_and(|ext| ext == "yaml" || ext == "yml") && path.exists() {
        return from_file(path);
    }

    if let Some(user_dir) = crate::config_paths::palettes_dir() {
        let user_path = user_dir.join(format!("{}.yaml", reference));
        if user_path.exists() {
            tracing::info!("Loading user palette from {}", user_path.display());
            return from_file(&user_path);
        }
    }

    tracing::debug!("Loading builtin palette: {}", reference);
    Palette::from_builtin(reference)
}
