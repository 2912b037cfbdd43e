//! Test fixtures and constants.

use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Profile ids used across tests
pub mod fids {
    /// Profile with an avatar
    pub const WITH_AVATAR: u64 = 3;

    /// Profile that exists but has no avatar
    pub const NO_AVATAR: u64 = 404;
}

/// Avatar color used by the mock image proxy
pub const AVATAR_COLOR: [u8; 3] = [200, 40, 90];

/// Encode a solid-color RGB PNG
pub fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    encode(RgbImage::from_pixel(width, height, Rgb(color)))
}

/// Encode a PNG whose left half is `left` and right half is `right`
pub fn split_png(size: u32, left: [u8; 3], right: [u8; 3]) -> Vec<u8> {
    encode(RgbImage::from_fn(size, size, |x, _| {
        if x < size / 2 {
            Rgb(left)
        } else {
            Rgb(right)
        }
    }))
}

fn encode(img: RgbImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .expect("Failed to encode PNG");
    buf.into_inner()
}
