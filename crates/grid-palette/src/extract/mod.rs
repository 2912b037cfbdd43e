//! Per-cell color reduction
//!
//! [`extract`] walks the grid in row-major order and reduces each cell's
//! pixels with the selected [`Method`].

mod kmeans;
mod mean;

use crate::color::Rgb;
use crate::error::PaletteError;
use crate::grid::{CellBounds, GridSpec};

pub use mean::mean_color;

/// How a cell is reduced to a single color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Per-channel arithmetic mean, rounded to nearest
    #[default]
    Mean,
    /// Centroid of a single-cluster k-means run
    KMeans,
}

/// One color per grid cell, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    grid: GridSpec,
    colors: Vec<Rgb>,
}

impl Palette {
    /// Build a palette from precomputed colors.
    ///
    /// Returns `None` when `colors` does not hold exactly one entry per cell.
    pub fn from_colors(grid: GridSpec, colors: Vec<Rgb>) -> Option<Self> {
        (colors.len() == grid.cell_count()).then_some(Self { grid, colors })
    }

    pub fn grid(&self) -> GridSpec {
        self.grid
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color of the cell at (`column`, `row`).
    pub fn get(&self, column: u32, row: u32) -> Option<Rgb> {
        self.grid.index(column, row).map(|i| self.colors[i])
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn to_hex_strings(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_hex()).collect()
    }
}

/// Reduce a `width × height` image to one color per cell of `grid`.
///
/// `pixels` is row-major, `width * height` entries long. Cells that cover no
/// pixels (grid finer than the image) are black.
pub fn extract(
    pixels: &[Rgb],
    width: u32,
    height: u32,
    grid: GridSpec,
    method: Method,
) -> Result<Palette, PaletteError> {
    grid.validate()?;
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(PaletteError::DimensionMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    let colors = grid
        .cells()
        .map(|(column, row)| {
            let bounds = grid.cell_bounds(width, height, column, row);
            if bounds.is_empty() {
                return Rgb::BLACK;
            }
            let cell = cell_pixels(pixels, width, bounds);
            let color = match method {
                Method::Mean => mean_color(cell),
                Method::KMeans => kmeans::centroid(cell),
            };
            color.unwrap_or(Rgb::BLACK)
        })
        .collect();

    Ok(Palette { grid, colors })
}

fn cell_pixels(pixels: &[Rgb], width: u32, b: CellBounds) -> impl Iterator<Item = Rgb> + '_ {
    (b.y0..b.y1).flat_map(move |y| {
        let start = (y * width + b.x0) as usize;
        let end = (y * width + b.x1) as usize;
        pixels[start..end].iter().copied()
    })
}
