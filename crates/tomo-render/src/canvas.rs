//! RGBA drawing surface with pixel, line and bitmap-text primitives.

use image::{Rgba, RgbaImage};

use crate::font::{self, CHAR_W};

/// An RGBA canvas backed by an [`image::RgbaImage`].
///
/// All primitives silently clip at the canvas edge, so callers can draw
/// labels near borders without bounds arithmetic.
#[derive(Debug)]
pub struct Canvas {
    img: RgbaImage,
}

impl Canvas {
    /// Create a canvas filled with a solid color.
    pub fn new(width: u32, height: u32, background: [u8; 4]) -> Self {
        Self {
            img: RgbaImage::from_pixel(width, height, Rgba(background)),
        }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.img.as_raw()
    }

    /// Consume the canvas, returning the image buffer.
    pub fn into_image(self) -> RgbaImage {
        self.img
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i64, y: i64, color: [u8; 4]) {
        if x >= 0 && y >= 0 && (x as u32) < self.img.width() && (y as u32) < self.img.height() {
            self.img.put_pixel(x as u32, y as u32, Rgba(color));
        }
    }

    /// Fill an axis-aligned rectangle; the right/bottom edges are exclusive.
    pub fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: [u8; 4]) {
        for dy in 0..h as i64 {
            for dx in 0..w as i64 {
                self.set_pixel(x + dx, y + dy, color);
            }
        }
    }

    pub fn hline(&mut self, x: i64, y: i64, w: u32, color: [u8; 4]) {
        for dx in 0..w as i64 {
            self.set_pixel(x + dx, y, color);
        }
    }

    pub fn vline(&mut self, x: i64, y: i64, h: u32, color: [u8; 4]) {
        for dy in 0..h as i64 {
            self.set_pixel(x, y + dy, color);
        }
    }

    /// Draw a line between two points (simple DDA; coastline segments are
    /// short enough that sub-pixel accuracy does not matter).
    pub fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: [u8; 4]) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = (x0 + dx * t).round() as i64;
            let y = (y0 + dy * t).round() as i64;
            self.set_pixel(x, y, color);
        }
    }

    /// Draw one character of the embedded 5x7 font at an integer scale.
    pub fn draw_char(&mut self, x: i64, y: i64, ch: char, scale: u32, color: [u8; 4]) {
        let Some(rows) = font::glyph(ch) else {
            return;
        };
        let s = scale as i64;
        for (row, &bits) in rows.iter().enumerate() {
            for col in 0..5i64 {
                if bits & (0x10 >> col) != 0 {
                    self.fill_rect(x + col * s, y + row as i64 * s, scale, scale, color);
                }
            }
        }
    }

    /// Draw a string left-aligned at (x, y).
    pub fn draw_text(&mut self, x: i64, y: i64, text: &str, scale: u32, color: [u8; 4]) {
        let advance = (CHAR_W * scale) as i64;
        for (i, ch) in text.chars().enumerate() {
            self.draw_char(x + i as i64 * advance, y, ch, scale, color);
        }
    }

    /// Draw a string horizontally centered on `cx`.
    pub fn draw_text_centered(&mut self, cx: i64, y: i64, text: &str, scale: u32, color: [u8; 4]) {
        let w = font::text_width(text, scale) as i64;
        self.draw_text(cx - w / 2, y, text, scale, color);
    }
}
