//! Grid partitioning

use crate::error::PaletteError;

/// Number of cells along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    pub columns: u32,
    pub rows: u32,
}

/// Half-open pixel rectangle covered by one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellBounds {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl CellBounds {
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            ((self.x1 - self.x0) * (self.y1 - self.y0)) as usize
        }
    }
}

impl GridSpec {
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Square grid with `n` cells per axis
    pub const fn square(n: u32) -> Self {
        Self::new(n, n)
    }

    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn validate(&self) -> Result<(), PaletteError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(PaletteError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(())
    }

    /// Row-major index of the cell at (`column`, `row`), if inside the grid.
    pub fn index(&self, column: u32, row: u32) -> Option<usize> {
        (column < self.columns && row < self.rows)
            .then(|| row as usize * self.columns as usize + column as usize)
    }

    /// Pixel bounds of a cell within a `width × height` image.
    ///
    /// Cell size is floor-divided, so trailing pixels beyond
    /// `columns * (width / columns)` never belong to any cell.
    pub fn cell_bounds(&self, width: u32, height: u32, column: u32, row: u32) -> CellBounds {
        let cell_w = width / self.columns.max(1);
        let cell_h = height / self.rows.max(1);
        CellBounds {
            x0: column * cell_w,
            y0: row * cell_h,
            x1: (column + 1) * cell_w,
            y1: (row + 1) * cell_h,
        }
    }

    /// Iterate cells in row-major order as (column, row).
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.columns).map(move |column| (column, row)))
    }
}
