//! Common types shared by the tomography plotting crates.

pub mod axes;
pub mod extent;

pub use axes::Axes;
pub use extent::GeoExtent;
