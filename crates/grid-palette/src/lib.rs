//! grid-palette: reduce an image to one color per grid cell
//!
//! The image is partitioned into a fixed `columns × rows` grid and each cell
//! is reduced to a single representative color, either the per-channel mean
//! or the centroid of a single-cluster k-means run.
//!
//! # Quick Start
//!
//! ```
//! use grid_palette::{extract, GridSpec, Method, Rgb};
//!
//! let pixels = vec![Rgb::new(200, 40, 40); 16];
//! let palette = extract(&pixels, 4, 4, GridSpec::new(2, 2), Method::Mean).unwrap();
//!
//! assert_eq!(palette.len(), 4);
//! assert_eq!(palette.get(1, 1), Some(Rgb::new(200, 40, 40)));
//! ```
//!
//! # Grid Partitioning
//!
//! Cell sizes use integer floor division (`width / columns`,
//! `height / rows`). Pixels left over in the last row or column are dropped,
//! never spread across cells. When the grid is finer than the image a cell
//! may contain no pixels at all; such cells come out black.
//!
//! ```text
//!  width = 10, columns = 3  ->  cell width 3
//!  | 0 1 2 | 3 4 5 | 6 7 8 | 9 |
//!  | cell0 | cell1 | cell2 | dropped
//! ```
//!
//! The resulting [`Palette`] always holds exactly `columns × rows` entries in
//! row-major order.

mod color;
mod error;
mod extract;
mod grid;

pub use color::{ParseColorError, Rgb};
pub use error::PaletteError;
pub use extract::{extract, mean_color, Method, Palette};
pub use grid::{CellBounds, GridSpec};
