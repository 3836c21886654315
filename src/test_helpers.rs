//! Shared fixtures for the bmpfx test suite.
//!
//! BMP byte fixtures are assembled by hand, independently of the codec
//! under test, so codec tests exercise real parsing rather than a
//! round-trip through the code being verified. Pixel lists are given
//! top-down (visual order); the builders write the file bottom-up as the
//! format requires.

use crate::raster::{Raster, Rgb, row_bytes};

/// Deterministic multi-channel test raster. Channels vary independently so
/// channel-swapping or channel-averaging bugs can't cancel out.
pub fn gradient_raster(width: usize, height: usize) -> Raster {
    let mut r = Raster::new(width, height).unwrap();
    for y in 0..height {
        for x in 0..width {
            let c = Rgb::new(
                ((x * 37 + y * 11) % 256) as u8,
                ((x * 5 + y * 83) % 256) as u8,
                ((x * 101 + y * 29 + 7) % 256) as u8,
            );
            r.set_pixel(x, y, c).unwrap();
        }
    }
    r
}

/// Full BMP file bytes with a gap of `gap` marker bytes between the headers
/// and the pixel data (pixel-data offset = 54 + gap).
pub fn bmp_bytes(width: usize, height: usize, pixels_top_down: &[Rgb], gap: usize) -> Vec<u8> {
    assert_eq!(pixels_top_down.len(), width * height);
    let stride = row_bytes(width);
    let offset = 54 + gap;
    let file_size = offset + stride * height;

    let mut out = Vec::with_capacity(file_size);
    // File header.
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(file_size as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 4]); // reserved
    out.extend_from_slice(&(offset as u32).to_le_bytes());
    // Info header.
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&24u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // compression
    out.extend_from_slice(&((stride * height) as u32).to_le_bytes());
    out.extend_from_slice(&2835i32.to_le_bytes());
    out.extend_from_slice(&2835i32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    // Gap bytes carry a marker value to make pass-through checks meaningful.
    out.extend(std::iter::repeat_n(0xEEu8, gap));
    // Pixel rows, bottom visual row first.
    for y in (0..height).rev() {
        for x in 0..width {
            let px = pixels_top_down[y * width + x];
            out.extend_from_slice(&[px.blue, px.green, px.red]);
        }
        out.extend(std::iter::repeat_n(0u8, stride - width * 3));
    }
    assert_eq!(out.len(), file_size);
    out
}

/// BMP with the standard 54-byte preamble and the given top-down pixels.
pub fn small_bmp(width: usize, height: usize, pixels_top_down: &[Rgb]) -> Vec<u8> {
    bmp_bytes(width, height, pixels_top_down, 0)
}

/// Checkerboard BMP, offset by a gap of marker bytes before the pixel data.
pub fn bmp_with_gap(width: usize, height: usize, gap: usize) -> Vec<u8> {
    bmp_bytes(width, height, &checker_pixels(width, height), gap)
}

/// Checkerboard BMP with distinct row colors, handy for bottom-up checks.
pub fn checker_bmp(width: usize, height: usize) -> Vec<u8> {
    bmp_bytes(width, height, &checker_pixels(width, height), 0)
}

fn checker_pixels(width: usize, height: usize) -> Vec<Rgb> {
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            // Row index folded into the color so every row differs.
            pixels.push(if (x + y) % 2 == 0 {
                Rgb::new(255, 10 + y as u8, 0)
            } else {
                Rgb::new(0, 10 + y as u8, 255)
            });
        }
    }
    pixels
}
