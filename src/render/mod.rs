//! Styled rendering of a finished matrix onto raster and SVG backends.

mod raster;
mod svg;

pub use raster::render_raster;
pub use svg::render_svg;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{QrError, QrResult};

// Quiet zone thickness in modules on every side
pub const QUIET_ZONE: u32 = 2;

// Logo edge relative to the full render size
pub(crate) const LOGO_RATIO: f32 = 0.2;

// Clearance around the logo so it never touches modules
pub(crate) const LOGO_PADDING_PX: u32 = 4;

// Visual style
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Standard,
    Dotted,
    Rounded,
    Pixelated,
    Abstract,
}

impl Style {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Dotted => "dotted",
            Self::Rounded => "rounded",
            Self::Pixelated => "pixelated",
            Self::Abstract => "abstract",
        }
    }

    pub fn all() -> [Self; 5] {
        [Self::Standard, Self::Dotted, Self::Rounded, Self::Pixelated, Self::Abstract]
    }
}

impl FromStr for Style {
    type Err = QrError;

    fn from_str(s: &str) -> QrResult<Self> {
        match s {
            "standard" => Ok(Self::Standard),
            "dotted" => Ok(Self::Dotted),
            "rounded" => Ok(Self::Rounded),
            "pixelated" => Ok(Self::Pixelated),
            "abstract" => Ok(Self::Abstract),
            _ => Err(QrError::UnsupportedStyle(s.to_string())),
        }
    }
}

impl Display for Style {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Render options
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub style: Style,
    pub foreground: Rgba<u8>,
    pub background: Rgba<u8>,
    pub target_size: u32,
    pub logo: Option<RgbaImage>,
}

impl RenderOptions {
    pub fn new(target_size: u32) -> Self {
        Self {
            style: Style::Standard,
            foreground: Rgba([0, 0, 0, 255]),
            background: Rgba([255, 255, 255, 255]),
            target_size,
            logo: None,
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn foreground(mut self, color: Rgba<u8>) -> Self {
        self.foreground = color;
        self
    }

    pub fn background(mut self, color: Rgba<u8>) -> Self {
        self.background = color;
        self
    }

    pub fn logo(mut self, logo: RgbaImage) -> Self {
        self.logo = Some(logo);
        self
    }
}

// Pixel layout
//------------------------------------------------------------------------------

// Maps module coordinates to pixel positions. The module size stays
// fractional so the symbol always fills the requested canvas exactly;
// rounding happens per edge when primitives are drawn.
pub(crate) struct Layout {
    pub module_px: f32,
    pub origin: f32,
}

impl Layout {
    pub fn new(width: usize, target_size: u32) -> QrResult<Self> {
        let side = width as u32 + 2 * QUIET_ZONE;
        if target_size < side {
            return Err(QrError::RenderTargetInvalid);
        }
        let module_px = target_size as f32 / side as f32;
        Ok(Self { module_px, origin: QUIET_ZONE as f32 * module_px })
    }

    // Top-left pixel position of a module
    pub fn module_pos(&self, r: i16, c: i16) -> (f32, f32) {
        (self.origin + c as f32 * self.module_px, self.origin + r as f32 * self.module_px)
    }
}

// Pixel rectangle covered by the logo, padding included
pub(crate) fn logo_clear_rect(target_size: u32) -> (f32, f32, f32, f32) {
    let logo_sz = target_size as f32 * LOGO_RATIO;
    let start = (target_size as f32 - logo_sz) / 2.0 - LOGO_PADDING_PX as f32;
    let end = (target_size as f32 + logo_sz) / 2.0 + LOGO_PADDING_PX as f32;
    (start, start, end, end)
}

#[cfg(test)]
mod render_option_tests {
    use std::str::FromStr;

    use test_case::test_case;

    use super::*;

    #[test_case("standard", Style::Standard)]
    #[test_case("dotted", Style::Dotted)]
    #[test_case("rounded", Style::Rounded)]
    #[test_case("pixelated", Style::Pixelated)]
    #[test_case("abstract", Style::Abstract)]
    fn test_style_parse(s: &str, expected: Style) {
        assert_eq!(Style::from_str(s).unwrap(), expected);
        assert_eq!(expected.as_str(), s);
    }

    #[test]
    fn test_style_parse_rejects_unknown() {
        assert_eq!(
            Style::from_str("neon"),
            Err(QrError::UnsupportedStyle("neon".to_string()))
        );
    }

    #[test]
    fn test_style_serde_round_trip() {
        for style in Style::all() {
            let json = serde_json::to_string(&style).unwrap();
            assert_eq!(json, format!("\"{style}\""));
            assert_eq!(serde_json::from_str::<Style>(&json).unwrap(), style);
        }
    }

    #[test]
    fn test_layout_rejects_tiny_target() {
        // Version 1 with the quiet zone needs at least 25 pixels
        assert!(Layout::new(21, 0).is_err());
        assert!(Layout::new(21, 24).is_err());
        assert!(Layout::new(21, 25).is_ok());
    }

    #[test]
    fn test_layout_fills_canvas() {
        let layout = Layout::new(25, 300).unwrap();
        let side = 25.0 + 2.0 * QUIET_ZONE as f32;
        assert!((layout.module_px * side - 300.0).abs() < 1e-3);
        let (x, y) = layout.module_pos(0, 0);
        assert!((x - layout.origin).abs() < 1e-6);
        assert!((y - layout.origin).abs() < 1e-6);
    }
}
