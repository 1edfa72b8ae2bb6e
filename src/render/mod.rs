//! Rendering: force-directed layout plus a backend-agnostic draw pass.
//!
//! The renderer talks to a [`DrawBackend`] capability trait rather than any
//! concrete canvas API, so a raster surface, an SVG writer or a text grid
//! can all satisfy it. Click handling is a plain [`NodeClick`] message handed
//! back to the controller; the renderer never mutates the graph or decides
//! navigation itself.

mod layout;
mod raster;
mod renderer;

pub use layout::LayoutEngine;
pub use raster::RasterSurface;
pub use renderer::{GraphRenderer, NodeClick, Theme};

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Pixel footprint of a label under a given font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub height: f32,
}

/// Minimal 2D drawing capability the renderer needs.
///
/// Coordinates are in surface pixels, origin top-left.
pub trait DrawBackend {
    /// Measure `text` at `size` using the backend's font metrics.
    fn measure_text(&self, text: &str, size: f32) -> TextMetrics;

    /// Fill the whole surface.
    fn clear(&mut self, color: Color);

    fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Color);

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color);

    fn fill_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, color: Color);

    /// Draw `text` with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, x: f32, y: f32, text: &str, size: f32, color: Color);
}
