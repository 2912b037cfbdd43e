use grid_palette::{Palette, PaletteError, Rgb};
use image::imageops::FilterType;

use crate::models::DesignConfig;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),
}

/// Decode an avatar and reduce it to the design's grid palette.
///
/// CPU bound; callers on the async runtime should run it in a blocking task.
pub fn palette_from_image(bytes: &[u8], design: &DesignConfig) -> Result<Palette, ExtractError> {
    let img = image::load_from_memory(bytes)?;
    let img = match design.sample_size {
        Some(size) => img.resize_exact(size, size, FilterType::Triangle),
        None => img,
    };

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let pixels: Vec<Rgb> = rgb.pixels().map(|p| Rgb::from_bytes(p.0)).collect();

    tracing::trace!(width, height, grid = ?design.grid, "Extracting palette");
    Ok(grid_palette::extract(
        &pixels,
        width,
        height,
        design.grid_spec(),
        design.method.into(),
    )?)
}
