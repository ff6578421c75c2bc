//! Diverging colormap and symmetric normalization.

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};

/// Symmetric value normalization: maps [-vmax, +vmax] onto [0, 1].
///
/// Every panel of a page shares one norm so color encodes value comparably
/// across subplots. The two ends of the mapping are exactly -vmax and +vmax.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetricNorm {
    vmax: f32,
}

impl SymmetricNorm {
    /// Build a norm from a maximum absolute value.
    ///
    /// A zero or non-finite maximum (an all-zero grid, say) falls back to 1.0
    /// so that the mapping stays defined and zero lands on the midpoint.
    pub fn new(max_abs: f32) -> Self {
        let vmax = if max_abs.is_finite() && max_abs > 0.0 {
            max_abs
        } else {
            1.0
        };
        Self { vmax }
    }

    /// Upper end of the mapped range; the lower end is its negation.
    pub fn vmax(&self) -> f32 {
        self.vmax
    }

    pub fn vmin(&self) -> f32 {
        -self.vmax
    }

    /// Map a value to [0, 1], clamping out-of-range values to the ends.
    pub fn apply(&self, value: f32) -> f32 {
        if value.is_nan() {
            // NaN cells draw as the midpoint (white on a diverging ramp).
            return 0.5;
        }
        ((value + self.vmax) / (2.0 * self.vmax)).clamp(0.0, 1.0)
    }
}

/// Color stop at a normalized position along the ramp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position in [0, 1].
    pub position: f32,
    /// Hex color, "#rrggbb".
    pub color: String,
}

/// A diverging color ramp defined by ordered stops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivergingPalette {
    pub stops: Vec<ColorStop>,
}

impl Default for DivergingPalette {
    /// Blue-white-red ramp with white exactly at the midpoint, the
    /// conventional ramp for signed velocity perturbations.
    fn default() -> Self {
        let stops = [
            (0.0, "#000080"),
            (0.25, "#0000ff"),
            (0.5, "#ffffff"),
            (0.75, "#ff0000"),
            (1.0, "#800000"),
        ];
        Self {
            stops: stops
                .iter()
                .map(|&(position, color)| ColorStop {
                    position,
                    color: color.to_string(),
                })
                .collect(),
        }
    }
}

impl DivergingPalette {
    /// Load a palette from a JSON stop list.
    pub fn from_json(json: &str) -> Result<Self> {
        let palette: Self =
            serde_json::from_str(json).map_err(|e| RenderError::BadPalette(e.to_string()))?;
        if palette.stops.len() < 2 {
            return Err(RenderError::BadPalette(
                "a palette needs at least two stops".to_string(),
            ));
        }
        for pair in palette.stops.windows(2) {
            if pair[1].position < pair[0].position {
                return Err(RenderError::BadPalette(
                    "stop positions must be non-decreasing".to_string(),
                ));
            }
        }
        Ok(palette)
    }

    /// Color at a normalized position, linearly interpolated between stops.
    pub fn color_at(&self, t: f32) -> [u8; 4] {
        let t = t.clamp(0.0, 1.0);

        let first = &self.stops[0];
        if t <= first.position {
            return rgba(hex_to_rgb(&first.color));
        }
        for pair in self.stops.windows(2) {
            let (lo, hi) = (&pair[0], &pair[1]);
            if t <= hi.position {
                let span = hi.position - lo.position;
                let frac = if span > 0.0 { (t - lo.position) / span } else { 0.0 };
                return interpolate(hex_to_rgb(&lo.color), hex_to_rgb(&hi.color), frac);
            }
        }
        rgba(hex_to_rgb(&self.stops[self.stops.len() - 1].color))
    }
}

/// Parse "#rrggbb" to RGB; malformed input gives black.
fn hex_to_rgb(hex: &str) -> [u8; 3] {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return [0, 0, 0];
    }
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
    [r, g, b]
}

fn rgba([r, g, b]: [u8; 3]) -> [u8; 4] {
    [r, g, b, 255]
}

fn interpolate(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 * (1.0 - t) + y as f32 * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]), 255]
}
