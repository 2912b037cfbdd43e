//! Single-cluster k-means, delegated to `kmeans_colors`.

use kmeans_colors::get_kmeans;
use palette::Srgb;

use crate::color::Rgb;

const MAX_ITERATIONS: usize = 20;
const CONVERGENCE: f32 = 1e-5;
const SEED: u64 = 0;

/// Centroid of a k=1 clustering over `pixels` in sRGB space.
pub(super) fn centroid(pixels: impl Iterator<Item = Rgb>) -> Option<Rgb> {
    let buf: Vec<Srgb> = pixels
        .map(|p| Srgb::<u8>::new(p.r, p.g, p.b).into_format::<f32>())
        .collect();
    if buf.is_empty() {
        return None;
    }

    let result = get_kmeans(1, MAX_ITERATIONS, CONVERGENCE, false, &buf, SEED);
    let c = result.centroids.first()?;
    Some(Rgb::from_f64(
        c.red as f64 * 255.0,
        c.green as f64 * 255.0,
        c.blue as f64 * 255.0,
    ))
}
