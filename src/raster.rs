//! In-memory pixel buffer for 24-bit BMP rasters.
//!
//! The buffer keeps the file's native layout: rows are stored bottom-up
//! (buffer row 0 is the bottom visual scanline) and every row occupies
//! [`row_bytes`] bytes — `3·width` pixel bytes padded to a 4-byte boundary.
//! Keeping the native layout makes decode a straight copy and lets the
//! filter engine hand out whole rows as disjoint mutable slices.
//!
//! Pixel `(x, y)` with `y` counted from the *top* lives at buffer offset
//! `(height - 1 - y) · row_bytes + 3x`, bytes in blue, green, red order.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RasterError {
    #[error("pixel ({x}, {y}) out of range for {width}x{height} raster")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("section ({x0}, {y0})..({x1}, {y1}) exceeds {width}x{height} raster")]
    OutOfBounds {
        x0: usize,
        y0: usize,
        x1: usize,
        y1: usize,
        width: usize,
        height: usize,
    },
    #[error("invalid section dimensions: {reason}")]
    InvalidDimensions { reason: String },
}

/// One pixel in BMP wire order: blue, green, red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        blue: 0,
        green: 0,
        red: 0,
    };

    pub fn new(blue: u8, green: u8, red: u8) -> Self {
        Self { blue, green, red }
    }
}

/// Bytes per stored row: `3·width` rounded up to a multiple of 4.
pub fn row_bytes(width: usize) -> usize {
    (width * 3 + 3) & !3
}

/// Decoded pixel buffer plus dimensions.
///
/// Cloning is a deep copy — the filter engine clones a snapshot before
/// running kernel filters so workers never read a buffer being written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    buf: Vec<u8>,
}

impl Raster {
    /// Zero-filled (black) raster. Dimensions must both be positive.
    pub fn new(width: usize, height: usize) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions {
                reason: format!("raster dimensions must be positive, got {width}x{height}"),
            });
        }
        Ok(Self {
            width,
            height,
            buf: vec![0; row_bytes(width) * height],
        })
    }

    /// Wrap an already-filled buffer of exactly `row_bytes(width) · height`
    /// bytes in bottom-up row order. Used by the codec after validation.
    pub(crate) fn from_rows(width: usize, height: usize, buf: Vec<u8>) -> Self {
        debug_assert_eq!(buf.len(), row_bytes(width) * height);
        Self { width, height, buf }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn row_bytes(&self) -> usize {
        row_bytes(self.width)
    }

    pub(crate) fn buf(&self) -> &[u8] {
        &self.buf
    }

    pub(crate) fn buf_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    fn offset(&self, x: usize, y: usize) -> Result<usize, RasterError> {
        if x >= self.width || y >= self.height {
            return Err(RasterError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((self.height - 1 - y) * self.row_bytes() + 3 * x)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Result<Rgb, RasterError> {
        let i = self.offset(x, y)?;
        Ok(Rgb::new(self.buf[i], self.buf[i + 1], self.buf[i + 2]))
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) -> Result<(), RasterError> {
        let i = self.offset(x, y)?;
        self.buf[i] = color.blue;
        self.buf[i + 1] = color.green;
        self.buf[i + 2] = color.red;
        Ok(())
    }

    /// Pixel at `(x, y)`, or black when the coordinates fall outside the
    /// raster. This is the zero-fill edge policy kernel filters sample with.
    pub fn sample_zero(&self, x: i64, y: i64) -> Rgb {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Rgb::BLACK;
        }
        let i = (self.height - 1 - y as usize) * self.row_bytes() + 3 * x as usize;
        Rgb::new(self.buf[i], self.buf[i + 1], self.buf[i + 2])
    }

    fn check_section(
        &self,
        x0: usize,
        y0: usize,
        x1: usize,
        y1: usize,
    ) -> Result<(usize, usize), RasterError> {
        if x1 <= x0 || y1 <= y0 {
            return Err(RasterError::InvalidDimensions {
                reason: format!("({x0}, {y0})..({x1}, {y1}) has non-positive extent"),
            });
        }
        Ok((x1 - x0, y1 - y0))
    }

    /// Copy of the rectangle `[x0, x1) × [y0, y1)`, row-major, top row first.
    ///
    /// The rectangle must lie fully inside the raster — out-of-bounds
    /// rectangles are rejected, never clamped or filled.
    pub fn section(
        &self,
        x0: usize,
        y0: usize,
        x1: usize,
        y1: usize,
    ) -> Result<Vec<Rgb>, RasterError> {
        let (w, h) = self.check_section(x0, y0, x1, y1)?;
        if x1 > self.width || y1 > self.height {
            return Err(RasterError::OutOfBounds {
                x0,
                y0,
                x1,
                y1,
                width: self.width,
                height: self.height,
            });
        }
        let mut out = Vec::with_capacity(w * h);
        for y in y0..y1 {
            for x in x0..x1 {
                out.push(self.pixel(x, y)?);
            }
        }
        Ok(out)
    }

    /// Write `data` (row-major, as produced by [`section`](Self::section))
    /// into the rectangle `[x0, x1) × [y0, y1)`.
    ///
    /// Bounds against the raster extents are enforced per pixel by
    /// [`set_pixel`](Self::set_pixel); a rectangle that sticks out fails on
    /// its first out-of-range pixel.
    pub fn set_section(
        &mut self,
        x0: usize,
        y0: usize,
        data: &[Rgb],
        x1: usize,
        y1: usize,
    ) -> Result<(), RasterError> {
        let (w, h) = self.check_section(x0, y0, x1, y1)?;
        if data.len() != w * h {
            return Err(RasterError::InvalidDimensions {
                reason: format!(
                    "section data holds {} pixels, rectangle needs {}",
                    data.len(),
                    w * h
                ),
            });
        }
        for (j, row) in data.chunks_exact(w).enumerate() {
            for (i, &color) in row.iter().enumerate() {
                self.set_pixel(x0 + i, y0 + j, color)?;
            }
        }
        Ok(())
    }
}
