//! Disk-backed memoization of the dense grid.
//!
//! The artifact is a fixed-path binary file: four little-endian `u64` shape
//! dimensions followed by the raw `f32` cell data. There is no version field
//! and no keying by input identity: an existing artifact is loaded
//! unconditionally, even if the source text file has changed since it was
//! written. Delete the file to force a recompute.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{GridError, Result};
use crate::resample::DenseGrid;

const HEADER_LEN: usize = 4 * 8;

/// Load the grid from `path` if the artifact exists, otherwise compute it
/// with `compute` and persist the result.
///
/// A present-but-garbled artifact is an error, not a silent recompute.
pub fn load_or_compute<F>(path: impl AsRef<Path>, compute: F) -> Result<DenseGrid>
where
    F: FnOnce() -> Result<DenseGrid>,
{
    let path = path.as_ref();
    if path.exists() {
        let grid = read_grid(path)?;
        info!(path = %path.display(), shape = ?grid.shape(), "loaded dense grid from cache");
        return Ok(grid);
    }

    let grid = compute()?;
    write_grid(path, &grid)?;
    info!(path = %path.display(), shape = ?grid.shape(), "wrote dense grid cache");
    Ok(grid)
}

/// Read a cache artifact.
pub fn read_grid(path: &Path) -> Result<DenseGrid> {
    let bytes = fs::read(path).map_err(|e| GridError::io(path, e))?;
    if bytes.len() < HEADER_LEN {
        return Err(GridError::bad_cache(path, "shorter than the shape header"));
    }

    let mut shape = [0usize; 4];
    for (i, dim) in shape.iter_mut().enumerate() {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&bytes[i * 8..(i + 1) * 8]);
        *dim = u64::from_le_bytes(raw) as usize;
    }

    // Dims come straight from the file, so the product must not be trusted
    // to fit in usize.
    let cell_count = shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| GridError::bad_cache(path, format!("shape {shape:?} overflows")))?;
    let body = &bytes[HEADER_LEN..];
    if body.len() != cell_count * 4 {
        return Err(GridError::bad_cache(
            path,
            format!(
                "shape {shape:?} needs {} data bytes, found {}",
                cell_count * 4,
                body.len()
            ),
        ));
    }

    // The byte slice may not be 4-aligned, so convert per element instead of
    // casting the whole slice.
    let values = body
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    Ok(DenseGrid::from_parts(shape, values))
}

/// Write a cache artifact.
pub fn write_grid(path: &Path, grid: &DenseGrid) -> Result<()> {
    let shape = grid.shape();
    let mut bytes = Vec::with_capacity(HEADER_LEN + grid.values().len() * 4);
    for dim in shape {
        bytes.extend_from_slice(&(dim as u64).to_le_bytes());
    }
    bytes.extend_from_slice(bytemuck::cast_slice::<f32, u8>(grid.values()));
    fs::write(path, bytes).map_err(|e| GridError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> DenseGrid {
        DenseGrid::from_parts([1, 2, 2, 1], vec![1.0, -2.0, 0.5, 0.0])
    }

    #[test]
    fn test_write_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.bin");
        let grid = sample_grid();
        write_grid(&path, &grid).unwrap();
        let loaded = read_grid(&path).unwrap();
        assert_eq!(loaded, grid);
    }

    #[test]
    fn test_compute_then_hit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.bin");

        let grid = load_or_compute(&path, || Ok(sample_grid())).unwrap();
        assert_eq!(grid, sample_grid());
        assert!(path.exists());

        // Second run must not call the closure.
        let hit = load_or_compute(&path, || panic!("cache should have been used")).unwrap();
        assert_eq!(hit, sample_grid());
    }

    /// The stale-cache hazard, as specified: an existing artifact wins even
    /// when the fresh input would produce a different grid.
    #[test]
    fn test_stale_cache_returned_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.bin");
        let stale = sample_grid();
        write_grid(&path, &stale).unwrap();

        let fresh = DenseGrid::from_parts([1, 1, 1, 1], vec![99.0]);
        let got = load_or_compute(&path, || Ok(fresh)).unwrap();
        assert_eq!(got, stale);
    }

    #[test]
    fn test_truncated_artifact_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.bin");
        write_grid(&path, &sample_grid()).unwrap();
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

        assert!(matches!(
            read_grid(&path),
            Err(GridError::BadCache { .. })
        ));
    }

    #[test]
    fn test_overflowing_shape_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.bin");
        // A garbled header whose dimension product exceeds usize.
        let mut bytes = Vec::new();
        for _ in 0..4 {
            bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        }
        fs::write(&path, &bytes).unwrap();
        assert!(matches!(read_grid(&path), Err(GridError::BadCache { .. })));
    }

    #[test]
    fn test_short_header_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.bin");
        fs::write(&path, [0u8; 7]).unwrap();
        assert!(matches!(read_grid(&path), Err(GridError::BadCache { .. })));
    }
}
