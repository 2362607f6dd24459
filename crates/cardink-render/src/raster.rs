//! CPU compositing primitives.
//!
//! Everything renders by inverse mapping: for each destination pixel inside
//! the transformed footprint, the source position is found by undoing the
//! rotation and scale, sampled bilinearly and blended source-over. That
//! keeps rotated output hole-free without supersampling.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use cardink_core::Color;
use image::{Rgba, RgbaImage};

use crate::fonts::FontStore;

/// Flood the whole buffer with one color.
pub fn fill(img: &mut RgbaImage, color: Color) {
    let pixel = Rgba([color.r, color.g, color.b, color.a]);
    for p in img.pixels_mut() {
        *p = pixel;
    }
}

/// Source-over blend of `src` (with `alpha` in [0,1] pre-applied to its
/// own alpha) onto the destination pixel.
pub fn blend_pixel(dst: &mut RgbaImage, x: u32, y: u32, src: Rgba<u8>, alpha: f64) {
    if x >= dst.width() || y >= dst.height() {
        return;
    }
    let sa = f64::from(src[3]) / 255.0 * alpha.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let d = dst.get_pixel_mut(x, y);
    let da = f64::from(d[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *d = Rgba([0, 0, 0, 0]);
        return;
    }
    for c in 0..3 {
        let s = f64::from(src[c]);
        let dc = f64::from(d[c]);
        let v = (s * sa + dc * da * (1.0 - sa)) / out_a;
        d[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    d[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Bilinear sample with edge clamping. Coordinates are in pixel space with
/// the origin at the top-left texel center.
fn sample_bilinear(src: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let max_x = (src.width() - 1) as f64;
    let max_y = (src.height() - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);
    let x0 = x.floor();
    let y0 = y.floor();
    let x1 = (x0 + 1.0).min(max_x);
    let y1 = (y0 + 1.0).min(max_y);
    let fx = x - x0;
    let fy = y - y0;

    let p00 = src.get_pixel(x0 as u32, y0 as u32);
    let p10 = src.get_pixel(x1 as u32, y0 as u32);
    let p01 = src.get_pixel(x0 as u32, y1 as u32);
    let p11 = src.get_pixel(x1 as u32, y1 as u32);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = f64::from(p00[c]) * (1.0 - fx) + f64::from(p10[c]) * fx;
        let bottom = f64::from(p01[c]) * (1.0 - fx) + f64::from(p11[c]) * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

/// Composite `src` into `dst`, scaled to the `w`x`h` box at `(x, y)`,
/// rotated by `rotation` degrees about the box center, with `opacity`
/// multiplied into the source alpha.
pub fn composite(
    dst: &mut RgbaImage,
    src: &RgbaImage,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    rotation: f64,
    opacity: f64,
) {
    if w <= 0.0 || h <= 0.0 || src.width() == 0 || src.height() == 0 {
        return;
    }
    let cx = x + w / 2.0;
    let cy = y + h / 2.0;
    let (sin, cos) = rotation.to_radians().sin_cos();

    // Destination footprint: the rotated box corners.
    let corners = [(x, y), (x + w, y), (x, y + h), (x + w, y + h)];
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;
    for (px, py) in corners {
        let dx = px - cx;
        let dy = py - cy;
        let rx = cx + dx * cos - dy * sin;
        let ry = cy + dx * sin + dy * cos;
        min_x = min_x.min(rx);
        min_y = min_y.min(ry);
        max_x = max_x.max(rx);
        max_y = max_y.max(ry);
    }
    let x_start = min_x.floor().max(0.0) as u32;
    let y_start = min_y.floor().max(0.0) as u32;
    let x_end = (max_x.ceil().min(f64::from(dst.width())) as u32).min(dst.width());
    let y_end = (max_y.ceil().min(f64::from(dst.height())) as u32).min(dst.height());

    let sx = f64::from(src.width()) / w;
    let sy = f64::from(src.height()) / h;

    for py in y_start..y_end {
        for px in x_start..x_end {
            // Undo the rotation about the box center.
            let dx = (f64::from(px) + 0.5) - cx;
            let dy = (f64::from(py) + 0.5) - cy;
            let ux = cx + dx * cos + dy * sin;
            let uy = cy - dx * sin + dy * cos;
            if ux < x || ux >= x + w || uy < y || uy >= y + h {
                continue;
            }
            let sample = sample_bilinear(src, (ux - x) * sx - 0.5, (uy - y) * sy - 0.5);
            blend_pixel(dst, px, py, sample, opacity);
        }
    }
}

/// Scale `src` to exactly cover `w`x`h`, preserving aspect ratio and
/// cropping the overflow symmetrically (CSS `background-size: cover`).
pub fn scale_to_fill(src: &RgbaImage, w: u32, h: u32) -> RgbaImage {
    let mut out = RgbaImage::new(w, h);
    if src.width() == 0 || src.height() == 0 || w == 0 || h == 0 {
        return out;
    }
    let scale = (f64::from(w) / f64::from(src.width()))
        .max(f64::from(h) / f64::from(src.height()));
    let offset_x = (f64::from(src.width()) - f64::from(w) / scale) / 2.0;
    let offset_y = (f64::from(src.height()) - f64::from(h) / scale) / 2.0;
    for y in 0..h {
        for x in 0..w {
            let sx = (f64::from(x) + 0.5) / scale + offset_x - 0.5;
            let sy = (f64::from(y) + 0.5) / scale + offset_y - 0.5;
            out.put_pixel(x, y, sample_bilinear(src, sx, sy));
        }
    }
    out
}

/// Rasterize a text block into its own tight buffer: one line per `\n`,
/// each line centered horizontally, stacked at the editor's 1.2 line
/// height. Returns `None` for degenerate input (no font coverage, zero
/// extent).
pub fn render_text_block(
    font: &FontArc,
    content: &str,
    font_size: f64,
    color: Color,
) -> Option<RgbaImage> {
    let lines: Vec<&str> = content.split('\n').collect();
    let line_height = font_size * cardink_core::items::LINE_HEIGHT_FACTOR;
    let block_width = lines
        .iter()
        .map(|line| FontStore::line_width(font, line, font_size))
        .fold(0.0f64, f64::max);
    let block_height = lines.len() as f64 * line_height;
    if block_width < 1.0 || block_height < 1.0 {
        return None;
    }
    let mut block = RgbaImage::new(block_width.ceil() as u32, block_height.ceil() as u32);

    let scaled = font.as_scaled(PxScale::from(font_size as f32));
    let pixel = Rgba([color.r, color.g, color.b, 255]);
    let color_alpha = f64::from(color.a) / 255.0;

    for (index, line) in lines.iter().enumerate() {
        let line_width = FontStore::line_width(font, line, font_size);
        let mut pen_x = (block_width - line_width) / 2.0;
        // Vertically center the glyph box inside the line box.
        let line_center = (index as f64 + 0.5) * line_height;
        let baseline =
            line_center + f64::from(scaled.ascent() + scaled.descent()) / 2.0;

        let mut prev = None;
        for ch in line.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                pen_x += f64::from(scaled.kern(prev, id));
            }
            let glyph = id.with_scale_and_position(
                PxScale::from(font_size as f32),
                ab_glyph::point(pen_x as f32, baseline as f32),
            );
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let bx = bounds.min.x + gx as f32;
                    let by = bounds.min.y + gy as f32;
                    if bx >= 0.0 && by >= 0.0 {
                        blend_pixel(
                            &mut block,
                            bx as u32,
                            by as u32,
                            pixel,
                            f64::from(coverage) * color_alpha,
                        );
                    }
                });
            }
            pen_x += f64::from(scaled.h_advance(id));
            prev = Some(id);
        }
    }
    Some(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(rgba))
    }

    #[test]
    fn fill_floods_every_pixel() {
        let mut img = RgbaImage::new(4, 4);
        fill(&mut img, Color::new(1, 2, 3, 255));
        assert!(img.pixels().all(|p| *p == Rgba([1, 2, 3, 255])));
    }

    #[test]
    fn opaque_composite_replaces_destination() {
        let mut dst = solid(10, 10, [0, 0, 0, 255]);
        let src = solid(4, 4, [200, 100, 50, 255]);
        composite(&mut dst, &src, 2.0, 2.0, 4.0, 4.0, 0.0, 1.0);
        assert_eq!(dst.get_pixel(4, 4), &Rgba([200, 100, 50, 255]));
        // Outside the box untouched.
        assert_eq!(dst.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn half_opacity_blends() {
        let mut dst = solid(4, 4, [0, 0, 0, 255]);
        let src = solid(4, 4, [255, 255, 255, 255]);
        composite(&mut dst, &src, 0.0, 0.0, 4.0, 4.0, 0.0, 0.5);
        let p = dst.get_pixel(2, 2);
        assert!(p[0] >= 126 && p[0] <= 129, "got {}", p[0]);
        assert_eq!(p[3], 255);
    }

    #[test]
    fn quarter_turn_swaps_axes() {
        let mut dst = RgbaImage::new(20, 20);
        // A wide flat bar rotated 90 degrees becomes a tall bar.
        let src = solid(8, 2, [255, 0, 0, 255]);
        composite(&mut dst, &src, 6.0, 9.0, 8.0, 2.0, 90.0, 1.0);
        assert_eq!(dst.get_pixel(10, 13)[0], 255);
        assert_eq!(dst.get_pixel(3, 10)[3], 0);
    }

    #[test]
    fn rotation_is_modulo_a_full_turn() {
        let src = solid(6, 4, [9, 9, 9, 255]);
        let mut a = RgbaImage::new(16, 16);
        let mut b = RgbaImage::new(16, 16);
        composite(&mut a, &src, 5.0, 6.0, 6.0, 4.0, 30.0, 1.0);
        composite(&mut b, &src, 5.0, 6.0, 6.0, 4.0, 390.0, 1.0);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn cover_scaling_fills_output() {
        let src = solid(100, 50, [7, 8, 9, 255]);
        let out = scale_to_fill(&src, 30, 30);
        assert_eq!(out.dimensions(), (30, 30));
        assert!(out.pixels().all(|p| p[3] == 255));
    }
}
