//! Coastline overlay.
//!
//! Ships a coarse built-in shoreline (lon/lat polylines, GMT multi-segment
//! text format) adequate for small map panels; a higher-resolution file in
//! the same format can be supplied instead.

use std::fs;
use std::path::Path;

use crate::canvas::Canvas;
use crate::error::Result;
use tomo_common::GeoExtent;

const BUILTIN: &str = include_str!("../assets/coastlines.txt");

/// Shoreline polylines in degrees.
#[derive(Debug, Clone)]
pub struct Coastlines {
    segments: Vec<Vec<(f64, f64)>>,
}

impl Coastlines {
    /// The built-in coarse world shoreline.
    pub fn builtin() -> Self {
        // The embedded asset is well-formed by construction.
        Self::parse(BUILTIN)
    }

    /// Load shoreline polylines from a file in the same format.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Parse GMT multi-segment text: `>` starts a new segment, `#` comments
    /// and blank or malformed lines are skipped.
    fn parse(text: &str) -> Self {
        let mut segments: Vec<Vec<(f64, f64)>> = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed.starts_with('>') {
                if current.len() > 1 {
                    segments.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
                continue;
            }
            let mut parts = trimmed.split_whitespace();
            if let (Some(lon), Some(lat)) = (parts.next(), parts.next()) {
                if let (Ok(lon), Ok(lat)) = (lon.parse::<f64>(), lat.parse::<f64>()) {
                    current.push((lon, lat));
                }
            }
        }
        if current.len() > 1 {
            segments.push(current);
        }

        Self { segments }
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Draw the shoreline into a pixel rectangle showing `extent`.
    ///
    /// `(x, y)` is the rectangle's top-left corner; north is up. Point pairs
    /// entirely outside the extent are skipped rather than clipped, which is
    /// fine at shoreline resolution.
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        x: i64,
        y: i64,
        width: u32,
        height: u32,
        extent: &GeoExtent,
        color: [u8; 4],
    ) {
        if extent.width() <= 0.0 || extent.height() <= 0.0 {
            return;
        }
        let to_px = |lon: f64, lat: f64| -> (f64, f64) {
            let fx = (lon - extent.min_lon) / extent.width();
            let fy = (extent.max_lat - lat) / extent.height();
            (x as f64 + fx * width as f64, y as f64 + fy * height as f64)
        };

        for segment in &self.segments {
            for pair in segment.windows(2) {
                let (lon0, lat0) = pair[0];
                let (lon1, lat1) = pair[1];
                if !extent.contains(lon0, lat0) && !extent.contains(lon1, lat1) {
                    continue;
                }
                let (x0, y0) = to_px(lon0, lat0);
                let (x1, y1) = to_px(lon1, lat1);
                canvas.line(x0, y0, x1, y1, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_parses() {
        let coast = Coastlines::builtin();
        assert!(coast.segment_count() >= 10);
    }

    #[test]
    fn test_parse_segments() {
        let coast = Coastlines::parse("> a\n0 0\n1 1\n> b\n2 2\n3 3\n4 4\n");
        assert_eq!(coast.segment_count(), 2);
        assert_eq!(coast.segments[1].len(), 3);
    }

    #[test]
    fn test_parse_drops_single_point_segments() {
        let coast = Coastlines::parse("> lone\n0 0\n> ok\n1 1\n2 2\n");
        assert_eq!(coast.segment_count(), 1);
    }

    #[test]
    fn test_draw_marks_pixels_inside_extent() {
        let coast = Coastlines::parse("> diag\n10 10\n20 20\n");
        let extent = GeoExtent::new(0.0, 0.0, 30.0, 30.0);
        let mut canvas = Canvas::new(30, 30, [255, 255, 255, 255]);
        coast.draw(&mut canvas, 0, 0, 30, 30, &extent, [0, 0, 0, 255]);
        assert!(canvas.pixels().chunks_exact(4).any(|p| p[0] == 0));
    }

    #[test]
    fn test_draw_skips_outside_extent() {
        let coast = Coastlines::parse("> far\n100 100\n110 110\n");
        let extent = GeoExtent::new(0.0, 0.0, 30.0, 30.0);
        let mut canvas = Canvas::new(30, 30, [255, 255, 255, 255]);
        coast.draw(&mut canvas, 0, 0, 30, 30, &extent, [0, 0, 0, 255]);
        assert!(canvas.pixels().chunks_exact(4).all(|p| p[0] == 255));
    }
}
