//! Error types for palette extraction

use std::fmt;

/// Error type for palette extraction.
///
/// Returned when the grid or the pixel buffer cannot describe a valid
/// partition.
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteError {
    /// Grid has zero columns or zero rows
    EmptyGrid {
        columns: u32,
        rows: u32,
    },
    /// Pixel buffer length does not match the stated dimensions
    DimensionMismatch {
        /// `width * height`
        expected: usize,
        /// Actual number of pixels supplied
        actual: usize,
    },
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::EmptyGrid { columns, rows } => {
                write!(f, "grid must have at least one cell (got {}x{})", columns, rows)
            }
            PaletteError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "pixel buffer holds {} pixels, dimensions require {}",
                    actual, expected
                )
            }
        }
    }
}

impl std::error::Error for PaletteError {}
