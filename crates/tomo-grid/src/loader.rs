//! Whitespace-delimited numeric text file loader.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{GridError, Result};

/// A row-major numeric matrix read from a text file.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Value at (row, col). Panics on out-of-range indices, like slice indexing.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// One row as a slice.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// One column, copied out.
    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.rows).map(|r| self.get(r, col)).collect()
    }

    /// Build a matrix from rows (test helper and loader backend).
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in &rows {
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }
}

/// Load a whitespace-delimited numeric text file into a matrix.
///
/// Blank lines and lines starting with `#` are skipped. Every remaining line
/// must parse as the same number of floating-point tokens; a ragged row or an
/// unparsable token is an error carrying the path and 1-based line number.
pub fn load_matrix(path: impl AsRef<Path>) -> Result<Matrix> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| GridError::io(path, e))?;

    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut n_cols = 0usize;

    for (line_no, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut row = Vec::with_capacity(n_cols);
        for token in trimmed.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| {
                GridError::parse(path, line_no + 1, format!("invalid number {token:?}"))
            })?;
            row.push(value);
        }

        if n_cols == 0 {
            n_cols = row.len();
        } else if row.len() != n_cols {
            return Err(GridError::parse(
                path,
                line_no + 1,
                format!("expected {} columns, found {}", n_cols, row.len()),
            ));
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(GridError::Empty(path.to_path_buf()));
    }

    debug!(path = %path.display(), rows = rows.len(), cols = n_cols, "loaded matrix");
    Matrix::from_rows(rows)
}
