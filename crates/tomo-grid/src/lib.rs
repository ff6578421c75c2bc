//! Scattered tomography data handling.
//!
//! Reads whitespace-delimited (lat, lon, radius, payload...) text files,
//! regularizes them onto a dense 4-D grid by exact-match bucketing, and
//! memoizes the dense grid to a binary cache file.

pub mod cache;
pub mod error;
pub mod loader;
pub mod resample;
pub mod scatter;

pub use cache::load_or_compute;
pub use error::{GridError, Result};
pub use loader::{load_matrix, Matrix};
pub use resample::DenseGrid;
pub use scatter::ScatterTable;
