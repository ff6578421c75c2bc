//! Coordinate axes recovered from scattered model points.

/// The distinct latitude, longitude and radius values present in a scattered
/// model file, each sorted ascending.
///
/// The scattered input is assumed to be a complete regular grid stored in
/// arbitrary row order, so the Cartesian product of the three sets addresses
/// every sample. That assumption is not verified here; resampling fills
/// missing combinations with zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    /// Distinct latitudes, degrees, ascending.
    pub lat: Vec<f64>,
    /// Distinct longitudes, degrees, ascending.
    pub lon: Vec<f64>,
    /// Distinct radii, km, ascending.
    pub radius: Vec<f64>,
}

impl Axes {
    /// Build axes from parallel coordinate arrays (one entry per sample row).
    ///
    /// Deduplication is by exact floating-point equality, matching the
    /// exact-match bucketing of the resampler.
    pub fn from_coords(lat: &[f64], lon: &[f64], radius: &[f64]) -> Self {
        Self {
            lat: sorted_unique(lat),
            lon: sorted_unique(lon),
            radius: sorted_unique(radius),
        }
    }

    /// Index of an exact latitude value, if present.
    pub fn lat_index(&self, v: f64) -> Option<usize> {
        exact_index(&self.lat, v)
    }

    /// Index of an exact longitude value, if present.
    pub fn lon_index(&self, v: f64) -> Option<usize> {
        exact_index(&self.lon, v)
    }

    /// Index of an exact radius value, if present.
    pub fn radius_index(&self, v: f64) -> Option<usize> {
        exact_index(&self.radius, v)
    }

    /// Number of cells in one horizontal slice.
    pub fn slice_len(&self) -> usize {
        self.lat.len() * self.lon.len()
    }
}

/// Sort ascending and drop exact duplicates.
fn sorted_unique(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out.dedup_by(|a, b| a.total_cmp(b).is_eq());
    out
}

/// Binary search by exact equality.
fn exact_index(sorted: &[f64], v: f64) -> Option<usize> {
    sorted.binary_search_by(|probe| probe.total_cmp(&v)).ok()
}
