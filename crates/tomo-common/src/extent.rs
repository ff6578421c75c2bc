//! Geographic extent of a map panel.

/// A geographic extent in degrees: the lon/lat window a panel displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoExtent {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl GeoExtent {
    /// Create a new extent from corner coordinates.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Extent spanning the given longitude and latitude coordinate sets.
    ///
    /// Both slices must be sorted ascending (as produced by `Axes`); the
    /// extent is simply first..last of each.
    pub fn from_axes(lons: &[f64], lats: &[f64]) -> Self {
        let min_lon = lons.first().copied().unwrap_or(0.0);
        let max_lon = lons.last().copied().unwrap_or(0.0);
        let min_lat = lats.first().copied().unwrap_or(0.0);
        let max_lat = lats.last().copied().unwrap_or(0.0);
        Self::new(min_lon, min_lat, max_lon, max_lat)
    }

    /// Width of the extent in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height of the extent in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Check if a point is contained within this extent.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_axes() {
        let lons = [100.0, 105.0, 110.0];
        let lats = [-10.0, 0.0, 10.0];
        let ext = GeoExtent::from_axes(&lons, &lats);
        assert_eq!(ext.min_lon, 100.0);
        assert_eq!(ext.max_lon, 110.0);
        assert_eq!(ext.min_lat, -10.0);
        assert_eq!(ext.max_lat, 10.0);
        assert_eq!(ext.width(), 10.0);
        assert_eq!(ext.height(), 20.0);
    }

    #[test]
    fn test_contains() {
        let ext = GeoExtent::new(0.0, -5.0, 20.0, 5.0);
        assert!(ext.contains(10.0, 0.0));
        assert!(ext.contains(0.0, -5.0));
        assert!(!ext.contains(-1.0, 0.0));
        assert!(!ext.contains(10.0, 6.0));
    }

    #[test]
    fn test_empty_axes() {
        let ext = GeoExtent::from_axes(&[], &[]);
        assert_eq!(ext.width(), 0.0);
        assert_eq!(ext.height(), 0.0);
    }
}
