//! Band-parallel filter execution.
//!
//! A filter invocation splits the raster into `min(threads, height)`
//! contiguous row bands and runs one task per band on a fixed-size rayon
//! pool, joining before returning. Per-pixel filters mutate their own band
//! in place; kernel filters read a frozen pre-filter snapshot and write
//! only their own band, so neighborhood reads may cross band boundaries
//! without ever observing a half-written row.
//!
//! Because each output pixel is a pure function of the transform and the
//! snapshot, the result is byte-identical for any thread count.

use super::FilterError;
use super::catalog::{Filter, KernelTransform, PixelTransform};
use crate::raster::{Raster, Rgb};

/// Row counts per band: `min(threads, height)` contiguous bands covering
/// every row, sizes differing by at most one.
fn band_rows(height: usize, threads: usize) -> Vec<usize> {
    let bands = threads.min(height);
    let base = height / bands;
    let extra = height % bands;
    (0..bands)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect()
}

/// Filter executor bound to a fixed worker count.
pub struct Engine {
    pool: rayon::ThreadPool,
    threads: usize,
}

impl Engine {
    /// Build an engine with exactly `threads` workers. Zero is invalid.
    pub fn new(threads: usize) -> Result<Self, FilterError> {
        if threads == 0 {
            return Err(FilterError::InvalidParameter(
                "thread count must be at least 1".into(),
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;
        Ok(Self { pool, threads })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Apply one resolved filter to the raster.
    pub fn run(&self, raster: &mut Raster, filter: &Filter) {
        match filter {
            Filter::Pixel(t) => self.run_pixel(raster, t.as_ref()),
            Filter::Kernel(t) => self.run_kernel(raster, t.as_ref()),
        }
    }

    /// Apply a per-pixel transform in place.
    ///
    /// Each band owns a disjoint `split_at_mut` slice of the buffer, so no
    /// synchronization is needed beyond the scope join.
    pub fn run_pixel(&self, raster: &mut Raster, transform: &dyn PixelTransform) {
        let stride = raster.row_bytes();
        let pixel_bytes = raster.width() * 3;
        let bands = band_rows(raster.height(), self.threads);
        let buf = raster.buf_mut();
        self.pool.scope(|s| {
            let mut rest = buf;
            for rows in bands {
                let (band, tail) = std::mem::take(&mut rest).split_at_mut(rows * stride);
                rest = tail;
                s.spawn(move |_| {
                    for row in band.chunks_exact_mut(stride) {
                        for px in row[..pixel_bytes].chunks_exact_mut(3) {
                            let out = transform.apply(Rgb::new(px[0], px[1], px[2]));
                            px[0] = out.blue;
                            px[1] = out.green;
                            px[2] = out.red;
                        }
                    }
                });
            }
        });
    }

    /// Apply a neighborhood transform.
    ///
    /// The pre-filter raster is cloned into a snapshot that workers read;
    /// writes go to each worker's own band of the live buffer. In-place
    /// read/write aliasing across bands cannot occur.
    pub fn run_kernel(&self, raster: &mut Raster, transform: &dyn KernelTransform) {
        let snapshot = raster.clone();
        let stride = snapshot.row_bytes();
        let width = snapshot.width();
        let height = snapshot.height();
        let bands = band_rows(height, self.threads);
        let buf = raster.buf_mut();
        let snap = &snapshot;
        self.pool.scope(|s| {
            // Bands walk the buffer bottom-up; `start` tracks the buffer
            // row index so each output row maps back to its visual y.
            let mut rest = buf;
            let mut start = 0usize;
            for rows in bands {
                let (band, tail) = std::mem::take(&mut rest).split_at_mut(rows * stride);
                rest = tail;
                let band_start = start;
                start += rows;
                s.spawn(move |_| {
                    for (i, row) in band.chunks_exact_mut(stride).enumerate() {
                        let y = height - 1 - (band_start + i);
                        for x in 0..width {
                            let out = transform.apply(snap, x, y);
                            let o = 3 * x;
                            row[o] = out.blue;
                            row[o + 1] = out.green;
                            row[o + 2] = out.red;
                        }
                    }
                });
            }
        });
    }
}
