//! Map-page rendering for tomography grids.
//!
//! A "page" is one saved image holding a fixed grid of map panels. Each panel
//! is a pseudocolor mesh of one depth slice with coastlines and graticule
//! tick labels, colored through a diverging palette under a symmetric
//! normalization shared by every panel on the page.

pub mod canvas;
pub mod coast;
pub mod colormap;
pub mod error;
pub mod font;
pub mod page;
pub mod png;

pub use canvas::Canvas;
pub use coast::Coastlines;
pub use colormap::{ColorStop, DivergingPalette, SymmetricNorm};
pub use error::{RenderError, Result};
pub use page::{render_page, Panel, PageLayout};
