use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{ImageFormat, Rgba, RgbaImage};
use tracing::debug;

use super::{logo_clear_rect, Layout, RenderOptions, Style};
use crate::error::{QrError, QrResult};
use crate::matrix::Matrix;

// SVG rendering
//------------------------------------------------------------------------------

/// Emits the matrix as a standalone SVG document with one primitive per dark
/// module. With a logo, modules under the logo rect are omitted and the logo
/// is embedded as a base64 PNG data URL.
pub fn render_svg(mat: &Matrix, opts: &RenderOptions) -> QrResult<String> {
    let layout = Layout::new(mat.width(), opts.target_size)?;
    let target = opts.target_size;
    let m = layout.module_px;

    let w = mat.width() as i16;
    let mut out = String::with_capacity(64 * mat.count_dark_modules());
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{target}\" height=\"{target}\" \
         viewBox=\"0 0 {target} {target}\">\n"
    ));
    out.push_str(&format!(
        "<rect width=\"{target}\" height=\"{target}\" fill=\"{}\"/>\n",
        hex_color(opts.background)
    ));

    let clear = opts.logo.as_ref().map(|_| logo_clear_rect(target));
    out.push_str(&format!("<g fill=\"{}\">\n", hex_color(opts.foreground)));
    for r in 0..w {
        for c in 0..w {
            if !mat.is_dark(r, c) {
                continue;
            }
            let (x, y) = layout.module_pos(r, c);
            if let Some((x0, y0, x1, y1)) = clear {
                let (cx, cy) = (x + m / 2.0, y + m / 2.0);
                if cx >= x0 && cx < x1 && cy >= y0 && cy < y1 {
                    continue;
                }
            }
            out.push_str(&module_primitive(opts.style, x, y, m));
            out.push('\n');
        }
    }
    out.push_str("</g>\n");

    if let Some(logo) = &opts.logo {
        out.push_str(&logo_image_element(logo, target)?);
        out.push('\n');
    }
    out.push_str("</svg>\n");
    debug!(target_size = target, style = %opts.style, bytes = out.len(), "svg rendered");

    Ok(out)
}

fn module_primitive(style: Style, x: f32, y: f32, m: f32) -> String {
    match style {
        Style::Standard => {
            format!("<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{m:.2}\" height=\"{m:.2}\"/>")
        }
        Style::Dotted => {
            let (cx, cy) = (x + m / 2.0, y + m / 2.0);
            let r = m / 2.5;
            format!("<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{r:.2}\"/>")
        }
        Style::Rounded => {
            let rx = m / 4.0;
            format!(
                "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{m:.2}\" height=\"{m:.2}\" rx=\"{rx:.2}\"/>"
            )
        }
        Style::Pixelated => {
            let gap = m * 0.15;
            let (ix, iy) = (x + gap, y + gap);
            let sz = m - 2.0 * gap;
            format!("<rect x=\"{ix:.2}\" y=\"{iy:.2}\" width=\"{sz:.2}\" height=\"{sz:.2}\"/>")
        }
        Style::Abstract => {
            let (cx, cy) = (x + m / 2.0, y + m / 2.0);
            format!(
                "<polygon points=\"{cx:.2},{y:.2} {:.2},{cy:.2} {cx:.2},{:.2} {x:.2},{cy:.2}\"/>",
                x + m,
                y + m
            )
        }
    }
}

fn logo_image_element(logo: &RgbaImage, target_size: u32) -> QrResult<String> {
    let logo_sz = target_size as f32 * super::LOGO_RATIO;
    let start = (target_size as f32 - logo_sz) / 2.0;

    let mut png = Vec::new();
    logo.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| QrError::Io(e.to_string()))?;
    Ok(format!(
        "<image x=\"{start:.2}\" y=\"{start:.2}\" width=\"{logo_sz:.2}\" height=\"{logo_sz:.2}\" \
         href=\"data:image/png;base64,{}\"/>",
        BASE64.encode(&png)
    ))
}

fn hex_color(color: Rgba<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

#[cfg(test)]
mod svg_tests {
    use image::{Rgba, RgbaImage};
    use test_case::test_case;

    use super::super::{RenderOptions, Style};
    use super::{hex_color, render_svg};
    use crate::metadata::ECLevel;
    use crate::QrBuilder;

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color(Rgba([0, 0, 0, 255])), "#000000");
        assert_eq!(hex_color(Rgba([255, 160, 16, 255])), "#ffa010");
    }

    #[test]
    fn test_svg_rejects_tiny_target() {
        let mat = QrBuilder::new(b"hello").build().unwrap();
        assert!(render_svg(&mat, &RenderOptions::new(10)).is_err());
    }

    #[test]
    fn test_svg_document_shape() {
        let mat = QrBuilder::new(b"hello").build().unwrap();
        let svg = render_svg(&mat, &RenderOptions::new(300)).unwrap();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("viewBox=\"0 0 300 300\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test_case(Style::Standard, "<rect x=")]
    #[test_case(Style::Dotted, "<circle ")]
    #[test_case(Style::Rounded, " rx=")]
    #[test_case(Style::Pixelated, "<rect x=")]
    #[test_case(Style::Abstract, "<polygon ")]
    fn test_one_primitive_per_dark_module(style: Style, needle: &str) {
        let mat = QrBuilder::new(b"svg shapes").ec_level(ECLevel::Q).build().unwrap();
        let svg = render_svg(&mat, &RenderOptions::new(300).style(style)).unwrap();
        assert_eq!(svg.matches(needle).count(), mat.count_dark_modules());
    }

    #[test]
    fn test_svg_is_deterministic() {
        let mat = QrBuilder::new(b"determinism").build().unwrap();
        let opts = RenderOptions::new(256).style(Style::Rounded);
        assert_eq!(render_svg(&mat, &opts).unwrap(), render_svg(&mat, &opts).unwrap());
    }

    #[test]
    fn test_logo_embeds_data_url_and_clears_modules() {
        let logo = RgbaImage::from_pixel(32, 32, Rgba([10, 20, 30, 255]));
        let mat = QrBuilder::new(b"logo").ec_level(ECLevel::H).build().unwrap();
        let plain = render_svg(&mat, &RenderOptions::new(300)).unwrap();
        let with_logo = render_svg(&mat, &RenderOptions::new(300).logo(logo)).unwrap();
        assert!(with_logo.contains("data:image/png;base64,"));
        // Modules under the logo are dropped, so fewer primitives are emitted
        assert!(with_logo.matches("<rect x=").count() < plain.matches("<rect x=").count());
    }
}
