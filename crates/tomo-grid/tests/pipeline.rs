//! End-to-end loader → resampler → cache pipeline tests.

use std::fs;

use tomo_grid::{load_matrix, load_or_compute, DenseGrid, ScatterTable};

/// A complete 2x2x2 grid with one payload component, scattered row order.
const INPUT: &str = "\
# lat lon radius dvs
 5.0 100.0 3480.0  0.5
-5.0 110.0 3630.0 -0.8
 5.0 110.0 3480.0  0.1
-5.0 100.0 3480.0 -0.2
 5.0 100.0 3630.0  0.3
-5.0 110.0 3480.0  0.7
 5.0 110.0 3630.0 -0.4
-5.0 100.0 3630.0  0.6
";

#[test]
fn load_resample_and_cache() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("model1.dat");
    let cache = dir.path().join("model_grid.bin");
    fs::write(&input, INPUT).unwrap();

    let matrix = load_matrix(&input).unwrap();
    let table = ScatterTable::from_matrix(&matrix).unwrap();
    let axes = table.axes();
    assert_eq!(axes.lat, vec![-5.0, 5.0]);
    assert_eq!(axes.lon, vec![100.0, 110.0]);
    assert_eq!(axes.radius, vec![3480.0, 3630.0]);

    let grid = load_or_compute(&cache, || Ok(DenseGrid::resample(&table, &axes))).unwrap();
    assert_eq!(grid.shape(), [2, 2, 2, 1]);
    assert!(cache.exists());

    // Spot-check two cells against the scattered rows.
    assert_eq!(grid.value(1, 0, 0, 0), 0.5); // lat 5, lon 100, r 3480
    assert_eq!(grid.value(0, 1, 1, 0), -0.8); // lat -5, lon 110, r 3630

    // Normalization input for the renderer.
    assert_eq!(grid.component_abs_max(0), 0.8);
}

#[test]
fn cache_shadows_changed_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("model1.dat");
    let cache = dir.path().join("model_grid.bin");
    fs::write(&input, INPUT).unwrap();

    let first = {
        let matrix = load_matrix(&input).unwrap();
        let table = ScatterTable::from_matrix(&matrix).unwrap();
        let axes = table.axes();
        load_or_compute(&cache, || Ok(DenseGrid::resample(&table, &axes))).unwrap()
    };

    // Rewrite the input with completely different values. The cache file is
    // keyed only by its path, so the second run must return the first grid.
    fs::write(&input, INPUT.replace("0.5", "9.9")).unwrap();
    let second = {
        let matrix = load_matrix(&input).unwrap();
        let table = ScatterTable::from_matrix(&matrix).unwrap();
        let axes = table.axes();
        load_or_compute(&cache, || Ok(DenseGrid::resample(&table, &axes))).unwrap()
    };

    assert_eq!(second, first);
    assert_eq!(second.value(1, 0, 0, 0), 0.5);
}

#[test]
fn stale_cache_with_grown_input_fails_shape_check() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("model1.dat");
    let cache = dir.path().join("model_grid.bin");
    fs::write(&input, INPUT).unwrap();

    {
        let matrix = load_matrix(&input).unwrap();
        let table = ScatterTable::from_matrix(&matrix).unwrap();
        let axes = table.axes();
        load_or_compute(&cache, || Ok(DenseGrid::resample(&table, &axes))).unwrap();
    }

    // Grow the input by a third radius level. The cached grid still has two,
    // so the shape check must flag it before anyone indexes the fresh radius
    // axis by grid position.
    let grown = format!("{INPUT} 5.0 100.0 3700.0  0.9\n");
    fs::write(&input, grown).unwrap();

    let matrix = load_matrix(&input).unwrap();
    let table = ScatterTable::from_matrix(&matrix).unwrap();
    let axes = table.axes();
    assert_eq!(axes.radius.len(), 3);

    let grid = load_or_compute(&cache, || Ok(DenseGrid::resample(&table, &axes))).unwrap();
    assert_eq!(grid.radius_levels(), 2);
    assert!(!grid.matches_axes(&axes));
}
