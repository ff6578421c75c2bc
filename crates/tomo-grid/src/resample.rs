//! Exact-match resampling of scattered samples onto a dense 4-D grid.

use tracing::{debug, warn};

use crate::scatter::ScatterTable;
use tomo_common::Axes;

/// Dense grid indexed by (lat, lon, radius, component), zero-initialized.
///
/// Cells are filled by exact floating-point equality between a sample's
/// coordinates and the axis values: no tolerance, no interpolation. A
/// coordinate combination with no matching sample stays 0.0; a combination
/// matched by several samples keeps the last one in input-row order.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseGrid {
    /// (n_lat, n_lon, n_radius, n_components)
    shape: [usize; 4],
    values: Vec<f32>,
}

impl DenseGrid {
    /// Resample a scatter table onto the grid spanned by `axes`.
    ///
    /// Each sample's cell is found by direct axis lookup on the coordinate
    /// triple, which is behaviorally identical to scanning every (lat, lon,
    /// radius) combination for an exact match but linear in the sample count.
    pub fn resample(table: &ScatterTable, axes: &Axes) -> Self {
        let shape = [
            axes.lat.len(),
            axes.lon.len(),
            axes.radius.len(),
            table.components(),
        ];
        let mut values = vec![0.0f32; shape.iter().product()];

        let mut unmatched = 0usize;
        for row in 0..table.len() {
            let (Some(ilat), Some(ilon), Some(ir)) = (
                axes.lat_index(table.lat[row]),
                axes.lon_index(table.lon[row]),
                axes.radius_index(table.radius[row]),
            ) else {
                // Only possible when axes came from a different table.
                unmatched += 1;
                continue;
            };

            let base = ((ilat * shape[1] + ilon) * shape[2] + ir) * shape[3];
            values[base..base + shape[3]].copy_from_slice(table.payload_row(row));
        }

        if unmatched > 0 {
            warn!(unmatched, "samples had coordinates outside the axes");
        }
        debug!(?shape, samples = table.len(), "resampled scatter onto dense grid");

        Self { shape, values }
    }

    /// Rebuild a grid from a cached shape and cell data.
    pub fn from_parts(shape: [usize; 4], values: Vec<f32>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), values.len());
        Self { shape, values }
    }

    /// (n_lat, n_lon, n_radius, n_components).
    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    /// Number of payload components.
    pub fn components(&self) -> usize {
        self.shape[3]
    }

    /// Number of radius levels.
    pub fn radius_levels(&self) -> usize {
        self.shape[2]
    }

    /// Whether the spatial dimensions match the given axes.
    ///
    /// A cached grid read back from disk can disagree with axes recomputed
    /// from an edited input file; callers check this before indexing the
    /// axes by grid position.
    pub fn matches_axes(&self, axes: &Axes) -> bool {
        self.shape[0] == axes.lat.len()
            && self.shape[1] == axes.lon.len()
            && self.shape[2] == axes.radius.len()
    }

    /// Raw cell data, `[lat][lon][radius][component]` order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Single cell value.
    pub fn value(&self, ilat: usize, ilon: usize, ir: usize, comp: usize) -> f32 {
        let [_, n_lon, n_r, n_c] = self.shape;
        self.values[((ilat * n_lon + ilon) * n_r + ir) * n_c + comp]
    }

    /// One horizontal slice at a fixed radius level and component, row-major
    /// with the northernmost latitude first (the orientation panels draw in).
    pub fn slice(&self, ir: usize, comp: usize) -> Vec<f32> {
        let [n_lat, n_lon, _, _] = self.shape;
        let mut out = Vec::with_capacity(n_lat * n_lon);
        for ilat in (0..n_lat).rev() {
            for ilon in 0..n_lon {
                out.push(self.value(ilat, ilon, ir, comp));
            }
        }
        out
    }

    /// Maximum absolute cell value of one component over the whole grid.
    /// NaN cells are ignored rather than poisoning the maximum.
    pub fn component_abs_max(&self, comp: usize) -> f32 {
        let n_c = self.shape[3];
        self.values
            .iter()
            .skip(comp)
            .step_by(n_c)
            .fold(0.0f32, |m, v| m.max(v.abs()))
    }

    /// Maximum absolute cell value over every component.
    pub fn abs_max(&self) -> f32 {
        self.values.iter().fold(0.0f32, |m, v| m.max(v.abs()))
    }
}
