use crate::color::Rgb;

/// Per-channel mean of `pixels`, rounded to nearest.
///
/// Returns `None` for an empty iterator. Sums are integer, so the result does
/// not depend on iteration order.
pub fn mean_color(pixels: impl IntoIterator<Item = Rgb>) -> Option<Rgb> {
    let mut count = 0u64;
    let mut sum = [0u64; 3];
    for p in pixels {
        sum[0] += p.r as u64;
        sum[1] += p.g as u64;
        sum[2] += p.b as u64;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let n = count as f64;
    Some(Rgb::from_f64(
        sum[0] as f64 / n,
        sum[1] as f64 / n,
        sum[2] as f64 / n,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_no_mean() {
        assert_eq!(mean_color(std::iter::empty()), None);
    }

    #[test]
    fn mean_is_order_independent() {
        let pixels = vec![
            Rgb::new(1, 50, 200),
            Rgb::new(99, 0, 7),
            Rgb::new(254, 13, 64),
            Rgb::new(30, 30, 30),
        ];
        let forward = mean_color(pixels.iter().copied());
        let backward = mean_color(pixels.iter().rev().copied());
        assert_eq!(forward, backward);
    }

    #[test]
    fn mean_is_idempotent() {
        let pixels = vec![Rgb::new(10, 20, 30), Rgb::new(11, 21, 31)];
        let once = mean_color(pixels.clone()).unwrap();
        assert_eq!(mean_color(pixels), Some(once));
        assert_eq!(mean_color([once; 5]), Some(once));
    }

    #[test]
    fn half_values_round_up() {
        let pixels = [Rgb::new(0, 0, 0), Rgb::new(1, 3, 255)];
        assert_eq!(mean_color(pixels), Some(Rgb::new(1, 2, 128)));
    }
}
