//! Scatter sample table: coordinates split from payload columns.

use crate::error::{GridError, Result};
use crate::loader::Matrix;
use tomo_common::Axes;

/// Scattered samples as parallel arrays.
///
/// Columns 0..3 of the input matrix are latitude, longitude and radius;
/// every remaining column is one payload component (a velocity-perturbation
/// parameter, or one timestep of a sensitivity kernel). Payload is stored as
/// `f32`, the precision the dense grid and the renderer work in.
#[derive(Debug, Clone)]
pub struct ScatterTable {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub radius: Vec<f64>,
    /// Row-major payload, `len = samples * components`.
    payload: Vec<f32>,
    components: usize,
}

impl ScatterTable {
    /// Split a loaded matrix into coordinates and payload.
    pub fn from_matrix(matrix: &Matrix) -> Result<Self> {
        if matrix.cols < 4 {
            return Err(GridError::TooFewColumns {
                expected: 4,
                found: matrix.cols,
            });
        }

        let components = matrix.cols - 3;
        let mut payload = Vec::with_capacity(matrix.rows * components);
        for row in 0..matrix.rows {
            for comp in 0..components {
                payload.push(matrix.get(row, 3 + comp) as f32);
            }
        }

        Ok(Self {
            lat: matrix.column(0),
            lon: matrix.column(1),
            radius: matrix.column(2),
            payload,
            components,
        })
    }

    /// Number of sample rows.
    pub fn len(&self) -> usize {
        self.lat.len()
    }

    /// True when the table holds no samples.
    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }

    /// Number of payload components per sample.
    pub fn components(&self) -> usize {
        self.components
    }

    /// Payload vector of one sample row.
    pub fn payload_row(&self, row: usize) -> &[f32] {
        &self.payload[row * self.components..(row + 1) * self.components]
    }

    /// Replace payload NaNs with 0.0.
    ///
    /// The velocity-model workflow applies this before resampling; the kernel
    /// workflow does not, so kernel NaNs flow through untouched.
    pub fn zero_nan_payload(&mut self) {
        for v in &mut self.payload {
            if v.is_nan() {
                *v = 0.0;
            }
        }
    }

    /// Axes over this table's coordinates.
    pub fn axes(&self) -> Axes {
        Axes::from_coords(&self.lat, &self.lon, &self.radius)
    }
}
