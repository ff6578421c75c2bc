//! Fixed-layout pages of map panels.

use tracing::debug;

use crate::canvas::Canvas;
use crate::coast::Coastlines;
use crate::colormap::{DivergingPalette, SymmetricNorm};
use crate::error::{RenderError, Result};
use crate::font::{self, CHAR_H};
use tomo_common::GeoExtent;

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];
const COAST: [u8; 4] = [40, 40, 40, 255];

/// Page geometry: a fixed grid of equally sized panels.
///
/// The panel count is part of the page contract: a page built for 8 depth
/// slices stays a 2x4 grid whatever the data says, and rendering refuses
/// a radius axis of any other length.
#[derive(Debug, Clone, Copy)]
pub struct PageLayout {
    pub rows: usize,
    pub cols: usize,
    pub panel_width: u32,
    pub panel_height: u32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            rows: 2,
            cols: 4,
            panel_width: 300,
            panel_height: 240,
        }
    }
}

/// Per-panel gutters for labels, in pixels.
const GUTTER_LEFT: u32 = 40;
const GUTTER_BOTTOM: u32 = 22;
const TITLE_H: u32 = 18;
const PAGE_MARGIN: u32 = 12;

impl PageLayout {
    pub fn panel_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Full page pixel size, padded to even dimensions so the kernel frames
    /// stay encodable as yuv420p video.
    pub fn page_size(&self) -> (u32, u32) {
        let cell_w = GUTTER_LEFT + self.panel_width;
        let cell_h = TITLE_H + self.panel_height + GUTTER_BOTTOM;
        let w = 2 * PAGE_MARGIN + self.cols as u32 * cell_w;
        let h = 2 * PAGE_MARGIN + self.rows as u32 * cell_h;
        (w + (w & 1), h + (h & 1))
    }
}

/// One panel's worth of data: a depth slice and its title.
#[derive(Debug, Clone)]
pub struct Panel {
    /// Row-major slice values, northernmost latitude row first.
    pub values: Vec<f32>,
    /// Title drawn above the panel, e.g. `r=3480 km`.
    pub title: String,
}

/// Render one page.
///
/// `lat_axis` and `lon_axis` are the sorted ascending coordinate sets; every
/// panel must hold `lat_axis.len() * lon_axis.len()` values. All panels share
/// `norm`, so color encodes value comparably across the page.
pub fn render_page(
    layout: &PageLayout,
    panels: &[Panel],
    lat_axis: &[f64],
    lon_axis: &[f64],
    norm: &SymmetricNorm,
    palette: &DivergingPalette,
    coast: &Coastlines,
) -> Result<Canvas> {
    if panels.len() != layout.panel_count() {
        return Err(RenderError::LayoutMismatch {
            panels: layout.panel_count(),
            levels: panels.len(),
        });
    }
    let n_lat = lat_axis.len();
    let n_lon = lon_axis.len();
    for panel in panels {
        if panel.values.len() != n_lat * n_lon {
            return Err(RenderError::SliceShape {
                expected: n_lat * n_lon,
                found: panel.values.len(),
            });
        }
    }

    let extent = GeoExtent::from_axes(lon_axis, lat_axis);
    let (page_w, page_h) = layout.page_size();
    let mut canvas = Canvas::new(page_w, page_h, WHITE);
    debug!(page_w, page_h, panels = panels.len(), "rendering page");

    let cell_w = GUTTER_LEFT + layout.panel_width;
    let cell_h = TITLE_H + layout.panel_height + GUTTER_BOTTOM;

    for (idx, panel) in panels.iter().enumerate() {
        let row = idx / layout.cols;
        let col = idx % layout.cols;
        let px = (PAGE_MARGIN + col as u32 * cell_w + GUTTER_LEFT) as i64;
        let py = (PAGE_MARGIN + row as u32 * cell_h + TITLE_H) as i64;

        draw_mesh(&mut canvas, panel, px, py, layout, n_lat, n_lon, norm, palette);
        coast.draw(
            &mut canvas,
            px,
            py,
            layout.panel_width,
            layout.panel_height,
            &extent,
            COAST,
        );
        draw_frame(&mut canvas, px, py, layout.panel_width, layout.panel_height);
        draw_graticule_labels(&mut canvas, px, py, layout, &extent);
        canvas.draw_text_centered(
            px + layout.panel_width as i64 / 2,
            py - TITLE_H as i64 + 4,
            &panel.title,
            1,
            BLACK,
        );
    }

    Ok(canvas)
}

/// Pseudocolor mesh: one filled rectangle per grid node, no interpolation.
#[allow(clippy::too_many_arguments)]
fn draw_mesh(
    canvas: &mut Canvas,
    panel: &Panel,
    px: i64,
    py: i64,
    layout: &PageLayout,
    n_lat: usize,
    n_lon: usize,
    norm: &SymmetricNorm,
    palette: &DivergingPalette,
) {
    let pw = layout.panel_width as f64;
    let ph = layout.panel_height as f64;

    for ilat in 0..n_lat {
        let y0 = py + (ilat as f64 / n_lat as f64 * ph).round() as i64;
        let y1 = py + ((ilat + 1) as f64 / n_lat as f64 * ph).round() as i64;
        for ilon in 0..n_lon {
            let x0 = px + (ilon as f64 / n_lon as f64 * pw).round() as i64;
            let x1 = px + ((ilon + 1) as f64 / n_lon as f64 * pw).round() as i64;
            let value = panel.values[ilat * n_lon + ilon];
            let color = palette.color_at(norm.apply(value));
            canvas.fill_rect(x0, y0, (x1 - x0) as u32, (y1 - y0) as u32, color);
        }
    }
}

fn draw_frame(canvas: &mut Canvas, px: i64, py: i64, w: u32, h: u32) {
    canvas.hline(px, py, w, BLACK);
    canvas.hline(px, py + h as i64 - 1, w, BLACK);
    canvas.vline(px, py, h, BLACK);
    canvas.vline(px + w as i64 - 1, py, h, BLACK);
}

/// Tick labels on the left (latitude) and bottom (longitude) edges only.
/// No gridlines; top and right stay unlabeled.
fn draw_graticule_labels(canvas: &mut Canvas, px: i64, py: i64, layout: &PageLayout, extent: &GeoExtent) {
    // A single-value axis gives a zero-size extent; there are no ticks to
    // place and the fractional positions below would divide by zero.
    if extent.width() <= 0.0 || extent.height() <= 0.0 {
        return;
    }
    let pw = layout.panel_width as f64;
    let ph = layout.panel_height as f64;

    let lon_step = nice_step(extent.width());
    let mut lon = (extent.min_lon / lon_step).ceil() * lon_step;
    while lon <= extent.max_lon + 1e-9 {
        let fx = (lon - extent.min_lon) / extent.width();
        let x = px + (fx * pw).round() as i64;
        // Tick mark plus label under the panel.
        canvas.vline(x, py + ph as i64 - 1, 4, BLACK);
        canvas.draw_text_centered(x, py + ph as i64 + 6, &format_lon(lon), 1, BLACK);
        lon += lon_step;
    }

    let lat_step = nice_step(extent.height());
    let mut lat = (extent.min_lat / lat_step).ceil() * lat_step;
    while lat <= extent.max_lat + 1e-9 {
        let fy = (extent.max_lat - lat) / extent.height();
        let y = py + (fy * ph).round() as i64;
        canvas.hline(px - 3, y, 4, BLACK);
        let label = format_lat(lat);
        let w = font::text_width(&label, 1) as i64;
        canvas.draw_text(px - 5 - w, y - (CHAR_H as i64) / 2 + 1, &label, 1, BLACK);
        lat += lat_step;
    }
}

/// Pick a round tick interval for a degree range (targeting ~4 ticks).
fn nice_step(range: f64) -> f64 {
    let raw = (range / 4.0).max(f64::MIN_POSITIVE);
    let magnitude = 10.0f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let step = if normalized < 1.5 {
        1.0
    } else if normalized < 3.5 {
        2.0
    } else if normalized < 7.5 {
        5.0
    } else {
        10.0
    };
    step * magnitude
}

fn format_deg(v: f64) -> String {
    if v.fract().abs() < 1e-6 {
        format!("{}", v.abs() as i64)
    } else {
        format!("{:.1}", v.abs())
    }
}

/// "105E", "30W", "0".
pub fn format_lon(lon: f64) -> String {
    if lon == 0.0 {
        "0".to_string()
    } else if lon > 0.0 {
        format!("{}E", format_deg(lon))
    } else {
        format!("{}W", format_deg(lon))
    }
}

/// "15N", "5S", "0".
pub fn format_lat(lat: f64) -> String {
    if lat == 0.0 {
        "0".to_string()
    } else if lat > 0.0 {
        format!("{}N", format_deg(lat))
    } else {
        format!("{}S", format_deg(lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_panels(n: usize, n_lat: usize, n_lon: usize) -> Vec<Panel> {
        (0..n)
            .map(|i| Panel {
                values: vec![i as f32; n_lat * n_lon],
                title: format!("r={} km", 3480 + i * 50),
            })
            .collect()
    }

    #[test]
    fn test_page_size_is_even() {
        let (w, h) = PageLayout::default().page_size();
        assert_eq!(w % 2, 0);
        assert_eq!(h % 2, 0);
    }

    #[test]
    fn test_render_page_dimensions() {
        let layout = PageLayout::default();
        let lat = [0.0, 5.0, 10.0];
        let lon = [100.0, 110.0];
        let panels = simple_panels(8, lat.len(), lon.len());
        let canvas = render_page(
            &layout,
            &panels,
            &lat,
            &lon,
            &SymmetricNorm::new(8.0),
            &DivergingPalette::default(),
            &Coastlines::builtin(),
        )
        .unwrap();
        let (w, h) = layout.page_size();
        assert_eq!(canvas.width(), w);
        assert_eq!(canvas.height(), h);
    }

    #[test]
    fn test_layout_mismatch_fails_loudly() {
        let layout = PageLayout::default();
        let panels = simple_panels(5, 2, 2);
        let err = render_page(
            &layout,
            &panels,
            &[0.0, 5.0],
            &[100.0, 110.0],
            &SymmetricNorm::new(1.0),
            &DivergingPalette::default(),
            &Coastlines::builtin(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RenderError::LayoutMismatch { panels: 8, levels: 5 }
        ));
    }

    #[test]
    fn test_slice_shape_checked() {
        let layout = PageLayout::default();
        let mut panels = simple_panels(8, 2, 2);
        panels[3].values.pop();
        assert!(matches!(
            render_page(
                &layout,
                &panels,
                &[0.0, 5.0],
                &[100.0, 110.0],
                &SymmetricNorm::new(1.0),
                &DivergingPalette::default(),
                &Coastlines::builtin(),
            ),
            Err(RenderError::SliceShape { .. })
        ));
    }

    #[test]
    fn test_single_value_axis_renders_without_ticks() {
        // One distinct longitude collapses the extent to zero width; the
        // page must still render instead of looping or overflowing on tick
        // placement.
        let layout = PageLayout::default();
        let panels = simple_panels(8, 2, 1);
        let canvas = render_page(
            &layout,
            &panels,
            &[0.0, 5.0],
            &[0.0],
            &SymmetricNorm::new(1.0),
            &DivergingPalette::default(),
            &Coastlines::builtin(),
        )
        .unwrap();
        let (w, h) = layout.page_size();
        assert_eq!((canvas.width(), canvas.height()), (w, h));
    }

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(20.0), 5.0);
        assert_eq!(nice_step(4.0), 1.0);
        assert_eq!(nice_step(100.0), 20.0);
    }

    #[test]
    fn test_degree_formatting() {
        assert_eq!(format_lon(105.0), "105E");
        assert_eq!(format_lon(-30.0), "30W");
        assert_eq!(format_lon(0.0), "0");
        assert_eq!(format_lat(12.5), "12.5N");
        assert_eq!(format_lat(-5.0), "5S");
    }
}
