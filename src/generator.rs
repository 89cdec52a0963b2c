//! High level facade tying the encoder, renderer, and history together.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{ImageFormat, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{QrError, QrResult};
use crate::history::HistoryEntry;
use crate::matrix::Matrix;
use crate::metadata::ECLevel;
use crate::render::{render_raster, render_svg, RenderOptions, Style};
use crate::QrBuilder;

/// Longest accepted payload, in characters.
pub const MAX_CONTENT_LENGTH: usize = 1000;

pub const MIN_RENDER_SIZE: u32 = 100;
pub const MAX_RENDER_SIZE: u32 = 1000;

// Settings
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorSettings {
    pub error_correction: ECLevel,
    pub fg_color: String,
    pub bg_color: String,
    pub width: u32,
    pub height: u32,
    pub style: Style,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            error_correction: ECLevel::M,
            fg_color: "#000000".to_string(),
            bg_color: "#ffffff".to_string(),
            width: 300,
            height: 300,
            style: Style::Standard,
        }
    }
}

/// Parses a `#rrggbb` color into an opaque RGBA pixel.
pub fn parse_hex_color(s: &str) -> QrResult<Rgba<u8>> {
    let hex = s.strip_prefix('#').ok_or_else(|| QrError::InvalidColor(s.to_string()))?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(QrError::InvalidColor(s.to_string()));
    }
    let v = u32::from_str_radix(hex, 16).map_err(|_| QrError::InvalidColor(s.to_string()))?;
    Ok(Rgba([(v >> 16) as u8, (v >> 8) as u8, v as u8, 255]))
}

// Generation
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Generated {
    pub matrix: Matrix,
    pub png: Vec<u8>,
    pub svg: String,
}

impl Generated {
    pub fn png_data_url(&self) -> String {
        format!("data:image/png;base64,{}", BASE64.encode(&self.png))
    }

    pub fn to_history_entry(&self, content: &str, settings: &GeneratorSettings) -> HistoryEntry {
        HistoryEntry::new(content.to_string(), self.png_data_url(), settings.clone())
    }
}

/// Validates the request, encodes the payload, and renders both backends.
pub fn generate(
    content: &str,
    settings: &GeneratorSettings,
    logo: Option<RgbaImage>,
) -> QrResult<Generated> {
    if content.trim().is_empty() {
        return Err(QrError::InvalidPayload);
    }
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(QrError::PayloadTooLong);
    }
    if settings.width != settings.height
        || !(MIN_RENDER_SIZE..=MAX_RENDER_SIZE).contains(&settings.width)
    {
        return Err(QrError::InvalidDimensions);
    }

    let matrix = QrBuilder::new(content.as_bytes()).ec_level(settings.error_correction).build()?;

    let mut opts = RenderOptions::new(settings.width)
        .style(settings.style)
        .foreground(parse_hex_color(&settings.fg_color)?)
        .background(parse_hex_color(&settings.bg_color)?);
    if let Some(logo) = logo {
        opts = opts.logo(logo);
    }

    let raster = render_raster(&matrix, &opts)?;
    let mut png = Vec::new();
    raster
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| QrError::Io(e.to_string()))?;
    let svg = render_svg(&matrix, &opts)?;

    info!(
        version = %matrix.version(),
        ec_level = %matrix.ec_level(),
        style = %settings.style,
        size = settings.width,
        "code generated"
    );

    Ok(Generated { matrix, png, svg })
}
