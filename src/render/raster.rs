//! In-memory RGBA surface backend.
//!
//! Implements [`DrawBackend`] over a plain pixel buffer so export and tests
//! need no windowing system. Labels use an embedded 5x7 bitmap font
//! (uppercase-folded); glyphs are scaled with nearest-neighbour blocks.

use crate::render::{Color, DrawBackend, TextMetrics};

/// Glyph cell: 5 columns wide, 7 rows tall, one column of spacing.
const GLYPH_COLS: f32 = 6.0;
const GLYPH_ROWS: f32 = 7.0;

/// RGBA8 pixel surface, origin top-left.
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixel data, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Read back one pixel. Out-of-bounds reads return transparent black.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        if x >= self.width || y >= self.height {
            return Color::rgba(0, 0, 0, 0);
        }
        let i = ((y * self.width + x) * 4) as usize;
        Color::rgba(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        )
    }

    /// Source-over blend of `color` onto the pixel at `(x, y)`.
    fn plot(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let i = ((y as u32 * self.width + x as u32) * 4) as usize;
        let a = color.a as u32;
        if a == 0 {
            return;
        }
        let inv = 255 - a;
        self.pixels[i] = ((color.r as u32 * a + self.pixels[i] as u32 * inv) / 255) as u8;
        self.pixels[i + 1] = ((color.g as u32 * a + self.pixels[i + 1] as u32 * inv) / 255) as u8;
        self.pixels[i + 2] = ((color.b as u32 * a + self.pixels[i + 2] as u32 * inv) / 255) as u8;
        self.pixels[i + 3] = (a + self.pixels[i + 3] as u32 * inv / 255).min(255) as u8;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let (x0, y0) = (x.floor() as i32, y.floor() as i32);
        let (x1, y1) = ((x + w).ceil() as i32, (y + h).ceil() as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.plot(px, py, color);
            }
        }
    }
}

impl DrawBackend for RasterSurface {
    fn measure_text(&self, text: &str, size: f32) -> TextMetrics {
        let scale = size / GLYPH_ROWS;
        TextMetrics {
            width: text.chars().count() as f32 * GLYPH_COLS * scale,
            height: size,
        }
    }

    fn clear(&mut self, color: Color) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk[0] = color.r;
            chunk[1] = color.g;
            chunk[2] = color.b;
            chunk[3] = color.a;
        }
    }

    fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Color) {
        let (dx, dy) = (x2 - x1, y2 - y1);
        let length = (dx * dx + dy * dy).sqrt();
        if length < f32::EPSILON {
            return;
        }
        let steps = (length * 2.0).ceil() as u32;
        let r = (width / 2.0).max(0.5);
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let (cx, cy) = (x1 + dx * t, y1 + dy * t);
            // Stamp a small square per step; cheap and good enough for
            // hairline-to-thin strokes.
            self.fill_rect(cx - r, cy - r, r * 2.0, r * 2.0, color);
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        let r2 = radius * radius;
        let (x0, y0) = ((cx - radius).floor() as i32, (cy - radius).floor() as i32);
        let (x1, y1) = ((cx + radius).ceil() as i32, (cy + radius).ceil() as i32);
        for py in y0..=y1 {
            for px in x0..=x1 {
                let (dx, dy) = (px as f32 + 0.5 - cx, py as f32 + 0.5 - cy);
                if dx * dx + dy * dy <= r2 {
                    self.plot(px, py, color);
                }
            }
        }
    }

    fn fill_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, color: Color) {
        let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
        let r2 = r * r;
        let (x0, y0) = (x.floor() as i32, y.floor() as i32);
        let (x1, y1) = ((x + w).ceil() as i32, (y + h).ceil() as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                let (fx, fy) = (px as f32 + 0.5, py as f32 + 0.5);
                // Distance check only applies inside the corner squares.
                let cx = if fx < x + r {
                    Some(x + r)
                } else if fx > x + w - r {
                    Some(x + w - r)
                } else {
                    None
                };
                let cy = if fy < y + r {
                    Some(y + r)
                } else if fy > y + h - r {
                    Some(y + h - r)
                } else {
                    None
                };
                if let (Some(cx), Some(cy)) = (cx, cy) {
                    let (dx, dy) = (fx - cx, fy - cy);
                    if dx * dx + dy * dy > r2 {
                        continue;
                    }
                }
                self.plot(px, py, color);
            }
        }
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, size: f32, color: Color) {
        let scale = size / GLYPH_ROWS;
        for (i, c) in text.chars().enumerate() {
            let rows = glyph(c);
            let gx = x + i as f32 * GLYPH_COLS * scale;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..5 {
                    if bits & (0x10 >> col) != 0 {
                        self.fill_rect(
                            gx + col as f32 * scale,
                            y + row as f32 * scale,
                            scale,
                            scale,
                            color,
                        );
                    }
                }
            }
        }
    }
}

/// 5x7 glyph rows (bit 4 = leftmost column). Lowercase folds to uppercase;
/// anything outside the table renders as a hollow box.
fn glyph(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        ' ' => [0x00; 7],
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x0E, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        '\'' => [0x04, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        '/' => [0x01, 0x01, 0x02, 0x04, 0x08, 0x10, 0x10],
        '&' => [0x0C, 0x12, 0x14, 0x08, 0x15, 0x12, 0x0D],
        '?' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        _ => [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Color::rgb(255, 255, 255);
    const BLACK: Color = Color::rgb(0, 0, 0);

    #[test]
    fn test_clear_fills_every_pixel() {
        let mut surface = RasterSurface::new(4, 4);
        surface.clear(WHITE);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(surface.pixel(x, y), WHITE);
            }
        }
    }

    #[test]
    fn test_fill_circle_covers_center_not_corners() {
        let mut surface = RasterSurface::new(21, 21);
        surface.clear(BLACK);
        surface.fill_circle(10.0, 10.0, 5.0, WHITE);

        assert_eq!(surface.pixel(10, 10), WHITE);
        assert_eq!(surface.pixel(0, 0), BLACK);
        assert_eq!(surface.pixel(20, 20), BLACK);
    }

    #[test]
    fn test_stroke_line_marks_endpoints_and_midpoint() {
        let mut surface = RasterSurface::new(30, 30);
        surface.clear(BLACK);
        surface.stroke_line(2.0, 15.0, 28.0, 15.0, 2.0, WHITE);

        assert_eq!(surface.pixel(2, 15), WHITE);
        assert_eq!(surface.pixel(15, 15), WHITE);
        assert_eq!(surface.pixel(27, 15), WHITE);
        assert_eq!(surface.pixel(15, 2), BLACK);
    }

    #[test]
    fn test_round_rect_rounds_corners() {
        let mut surface = RasterSurface::new(40, 30);
        surface.clear(BLACK);
        surface.fill_round_rect(5.0, 5.0, 30.0, 20.0, 6.0, WHITE);

        // Interior and straight edge midpoints are filled.
        assert_eq!(surface.pixel(20, 15), WHITE);
        assert_eq!(surface.pixel(20, 5), WHITE);
        // The extreme corner pixel lies outside the corner radius.
        assert_eq!(surface.pixel(5, 5), BLACK);
    }

    #[test]
    fn test_draw_text_leaves_ink() {
        let mut surface = RasterSurface::new(120, 20);
        surface.clear(BLACK);
        surface.draw_text(2.0, 2.0, "Osmosis", 14.0, WHITE);

        let inked = (0..20)
            .flat_map(|y| (0..120).map(move |x| (x, y)))
            .filter(|&(x, y)| surface.pixel(x, y) == WHITE)
            .count();
        assert!(inked > 50, "expected glyph pixels, found {inked}");
    }

    #[test]
    fn test_measure_text_scales_with_size_and_length() {
        let surface = RasterSurface::new(1, 1);
        let short = surface.measure_text("ab", 14.0);
        let long = surface.measure_text("abcd", 14.0);
        assert!(long.width > short.width);
        assert_eq!(short.height, 14.0);

        let bigger = surface.measure_text("ab", 28.0);
        assert!((bigger.width - short.width * 2.0).abs() < 0.01);
    }

    #[test]
    fn test_plot_is_clipped_at_bounds() {
        let mut surface = RasterSurface::new(8, 8);
        surface.clear(BLACK);
        // Entirely off-surface drawing must not panic or wrap.
        surface.fill_circle(-20.0, -20.0, 5.0, WHITE);
        surface.stroke_line(-5.0, -5.0, -1.0, -1.0, 1.0, WHITE);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(surface.pixel(x, y), BLACK);
            }
        }
    }

    #[test]
    fn test_alpha_blending_mixes_colors() {
        let mut surface = RasterSurface::new(2, 2);
        surface.clear(BLACK);
        surface.fill_rect(0.0, 0.0, 2.0, 2.0, Color::rgba(255, 255, 255, 128));

        let px = surface.pixel(0, 0);
        assert!(px.r > 100 && px.r < 150, "half-alpha white over black: {px:?}");
    }
}
