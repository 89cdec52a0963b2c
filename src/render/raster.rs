use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;
use tracing::debug;

use super::{Layout, RenderOptions, Style, LOGO_PADDING_PX, LOGO_RATIO};
use crate::error::QrResult;
use crate::matrix::Matrix;

// Raster rendering
//------------------------------------------------------------------------------

/// Paints the matrix onto an RGBA canvas of exactly `target_size` pixels,
/// quiet zone included.
pub fn render_raster(mat: &Matrix, opts: &RenderOptions) -> QrResult<RgbaImage> {
    let layout = Layout::new(mat.width(), opts.target_size)?;
    let mut canvas = RgbaImage::from_pixel(opts.target_size, opts.target_size, opts.background);

    let w = mat.width() as i16;
    for r in 0..w {
        for c in 0..w {
            if mat.is_dark(r, c) {
                draw_module(&mut canvas, &layout, opts.style, opts.foreground, r, c);
            }
        }
    }

    if let Some(logo) = &opts.logo {
        overlay_logo(&mut canvas, logo, opts);
    }
    debug!(target_size = opts.target_size, style = %opts.style, "raster rendered");

    Ok(canvas)
}

fn draw_module(
    canvas: &mut RgbaImage,
    layout: &Layout,
    style: Style,
    fg: Rgba<u8>,
    r: i16,
    c: i16,
) {
    let m = layout.module_px;
    let (x, y) = layout.module_pos(r, c);
    // Rounding absolute edges keeps adjacent modules seamless even when the
    // module size is fractional
    let (px0, py0) = (x.round() as i32, y.round() as i32);
    let (px1, py1) = ((x + m).round() as i32, (y + m).round() as i32);
    if px1 <= px0 || py1 <= py0 {
        return;
    }

    match style {
        Style::Standard => {
            fill_rect(canvas, px0, py0, px1, py1, fg);
        }
        Style::Dotted => {
            let cx = (x + m / 2.0).round() as i32;
            let cy = (y + m / 2.0).round() as i32;
            let radius = ((m / 2.5).round() as i32).max(1);
            draw_filled_circle_mut(canvas, (cx, cy), radius, fg);
        }
        Style::Rounded => {
            let rad = (m / 4.0).round() as i32;
            if rad < 1 || px1 - px0 <= 2 * rad || py1 - py0 <= 2 * rad {
                fill_rect(canvas, px0, py0, px1, py1, fg);
                return;
            }
            fill_rect(canvas, px0 + rad, py0, px1 - rad, py1, fg);
            fill_rect(canvas, px0, py0 + rad, px1, py1 - rad, fg);
            for (cx, cy) in [
                (px0 + rad, py0 + rad),
                (px1 - rad - 1, py0 + rad),
                (px0 + rad, py1 - rad - 1),
                (px1 - rad - 1, py1 - rad - 1),
            ] {
                draw_filled_circle_mut(canvas, (cx, cy), rad, fg);
            }
        }
        Style::Pixelated => {
            let gap = m * 0.15;
            let (gx0, gy0) = ((x + gap).round() as i32, (y + gap).round() as i32);
            let (gx1, gy1) = ((x + m - gap).round() as i32, (y + m - gap).round() as i32);
            if gx1 <= gx0 || gy1 <= gy0 {
                fill_rect(canvas, px0, py0, px1, py1, fg);
                return;
            }
            fill_rect(canvas, gx0, gy0, gx1, gy1, fg);
        }
        Style::Abstract => {
            if px1 - px0 < 3 || py1 - py0 < 3 {
                fill_rect(canvas, px0, py0, px1, py1, fg);
                return;
            }
            let cx = (x + m / 2.0).round() as i32;
            let cy = (y + m / 2.0).round() as i32;
            let diamond = [
                Point::new(cx, py0),
                Point::new(px1 - 1, cy),
                Point::new(cx, py1 - 1),
                Point::new(px0, cy),
            ];
            draw_polygon_mut(canvas, &diamond, fg);
        }
    }
}

// Edge based rect fill, no-op when the span is empty
fn fill_rect(canvas: &mut RgbaImage, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba<u8>) {
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    let rect = Rect::at(x0, y0).of_size((x1 - x0) as u32, (y1 - y0) as u32);
    draw_filled_rect_mut(canvas, rect, color);
}

// Scales the logo to a fifth of the canvas and centers it over a background
// patch so the modules underneath never bleed through
fn overlay_logo(canvas: &mut RgbaImage, logo: &RgbaImage, opts: &RenderOptions) {
    let target = opts.target_size;
    let logo_sz = (target as f32 * LOGO_RATIO) as u32;
    if logo_sz == 0 {
        return;
    }

    let start = (target - logo_sz) / 2;
    let patch_start = start.saturating_sub(LOGO_PADDING_PX);
    let patch_end = (start + logo_sz + LOGO_PADDING_PX).min(target);
    fill_rect(
        canvas,
        patch_start as i32,
        patch_start as i32,
        patch_end as i32,
        patch_end as i32,
        opts.background,
    );

    let resized = imageops::resize(logo, logo_sz, logo_sz, imageops::FilterType::Triangle);
    imageops::overlay(canvas, &resized, start as i64, start as i64);
}

#[cfg(test)]
mod raster_tests {
    use image::{Rgba, RgbaImage};
    use test_case::test_case;

    use super::super::{logo_clear_rect, RenderOptions, Style, QUIET_ZONE};
    use super::render_raster;
    use crate::metadata::ECLevel;
    use crate::QrBuilder;

    const FG: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const BG: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn test_render_rejects_zero_target() {
        let mat = QrBuilder::new(b"hello").build().unwrap();
        assert!(render_raster(&mat, &RenderOptions::new(0)).is_err());
    }

    #[test]
    fn test_canvas_is_exactly_target_sized() {
        let mat = QrBuilder::new(b"hello").build().unwrap();
        let img = render_raster(&mat, &RenderOptions::new(300)).unwrap();
        assert_eq!(img.dimensions(), (300, 300));
    }

    #[test]
    fn test_quiet_zone_is_background() {
        let mat = QrBuilder::new(b"https://example.com").build().unwrap();
        let target = 300u32;
        let img = render_raster(&mat, &RenderOptions::new(target)).unwrap();
        let side = mat.width() as u32 + 2 * QUIET_ZONE;
        let qz_px = (target as f32 * QUIET_ZONE as f32 / side as f32).floor() as u32;
        for i in 0..target {
            for j in 0..qz_px - 1 {
                assert_eq!(*img.get_pixel(i, j), BG, "top edge at {i} {j}");
                assert_eq!(*img.get_pixel(j, i), BG, "left edge at {i} {j}");
                assert_eq!(*img.get_pixel(i, target - 1 - j), BG, "bottom edge");
                assert_eq!(*img.get_pixel(target - 1 - j, i), BG, "right edge");
            }
        }
    }

    #[test_case(Style::Standard)]
    #[test_case(Style::Dotted)]
    #[test_case(Style::Rounded)]
    #[test_case(Style::Pixelated)]
    #[test_case(Style::Abstract)]
    fn test_module_centers_match_matrix(style: Style) {
        let mat = QrBuilder::new(b"style check").ec_level(ECLevel::Q).build().unwrap();
        let target = 420u32;
        let opts = RenderOptions::new(target).style(style);
        let img = render_raster(&mat, &opts).unwrap();

        let side = mat.width() as u32 + 2 * QUIET_ZONE;
        let m = target as f32 / side as f32;
        for r in 0..mat.width() {
            for c in 0..mat.width() {
                let cx = ((QUIET_ZONE as usize + c) as f32 * m + m / 2.0) as u32;
                let cy = ((QUIET_ZONE as usize + r) as f32 * m + m / 2.0) as u32;
                let expected = if mat.is_dark(r as i16, c as i16) { FG } else { BG };
                assert_eq!(
                    *img.get_pixel(cx, cy),
                    expected,
                    "style {style} module {r} {c} at pixel {cx} {cy}"
                );
            }
        }
    }

    #[test]
    fn test_custom_colors() {
        let fg = Rgba([16, 32, 64, 255]);
        let bg = Rgba([250, 240, 230, 255]);
        let mat = QrBuilder::new(b"colors").build().unwrap();
        let opts = RenderOptions::new(250).foreground(fg).background(bg);
        let img = render_raster(&mat, &opts).unwrap();
        assert_eq!(*img.get_pixel(0, 0), bg);
        assert!(img.pixels().any(|p| *p == fg));
    }

    #[test]
    fn test_logo_patch_is_clear_of_modules() {
        let logo = RgbaImage::from_pixel(64, 64, Rgba([200, 30, 30, 255]));
        let mat = QrBuilder::new(b"logo").ec_level(ECLevel::H).build().unwrap();
        let target = 300u32;
        let opts = RenderOptions::new(target).logo(logo);
        let img = render_raster(&mat, &opts).unwrap();

        // Everything inside the padded logo rect is either logo or background
        let (x0, y0, x1, y1) = logo_clear_rect(target);
        let logo_px = Rgba([200, 30, 30, 255]);
        for y in y0.ceil() as u32..y1.floor() as u32 {
            for x in x0.ceil() as u32..x1.floor() as u32 {
                let p = *img.get_pixel(x, y);
                assert!(p == logo_px || p == BG, "unexpected pixel {p:?} at {x} {y}");
            }
        }
        assert!(img.pixels().any(|p| *p == logo_px));
    }
}
