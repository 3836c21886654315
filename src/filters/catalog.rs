//! Built-in filter catalog and the name → constructor registry.
//!
//! Filters come in two shapes. A [`PixelTransform`] is a pure `Rgb → Rgb`
//! function with no neighbor dependency; the engine applies it in place. A
//! [`KernelTransform`] reads a square neighborhood from a frozen snapshot of
//! the pre-filter raster. Neighborhood samples outside the raster are black
//! ([`Raster::sample_zero`]) — the zero-fill edge policy, applied by every
//! kernel filter in the catalog.
//!
//! Intermediate arithmetic is `u64` or `f64` — wide enough that no level
//! count or kernel size a caller can express overflows — with final channel
//! values rounded half up and clamped to `[0, 255]`.

use super::FilterError;
use super::params::{KernelSize, Levels, Strength};
use crate::raster::{Raster, Rgb};
use std::collections::BTreeMap;

/// Pure per-pixel transform, applied independently to every pixel.
pub trait PixelTransform: Sync {
    fn apply(&self, px: Rgb) -> Rgb;
}

/// Neighborhood transform: one output pixel from a read-only snapshot.
pub trait KernelTransform: Sync {
    fn apply(&self, src: &Raster, x: usize, y: usize) -> Rgb;
}

/// A resolved, ready-to-run filter.
pub enum Filter {
    Pixel(Box<dyn PixelTransform>),
    Kernel(Box<dyn KernelTransform>),
}

/// Integer division rounding half up.
fn round_div(num: u64, den: u64) -> u64 {
    (2 * num + den) / (2 * den)
}

// ── Per-pixel filters ───────────────────────────────────────────────

/// `identity` — output equals input.
pub struct Identity;

impl PixelTransform for Identity {
    fn apply(&self, px: Rgb) -> Rgb {
        px
    }
}

/// `negative` — every channel inverted.
pub struct Negative;

impl PixelTransform for Negative {
    fn apply(&self, px: Rgb) -> Rgb {
        Rgb::new(255 - px.blue, 255 - px.green, 255 - px.red)
    }
}

/// `grayscale` — Rec. 601 luma written to all three channels.
pub struct Grayscale;

impl PixelTransform for Grayscale {
    fn apply(&self, px: Rgb) -> Rgb {
        let luma = (299 * px.red as u32 + 587 * px.green as u32 + 114 * px.blue as u32 + 500)
            / 1000;
        let luma = luma as u8;
        Rgb::new(luma, luma, luma)
    }
}

/// `threshold:N` — each channel snapped to the nearest of `N` evenly
/// spaced levels spanning `[0, 255]`.
pub struct Threshold {
    levels: Levels,
}

impl Threshold {
    pub fn new(levels: Levels) -> Self {
        Self { levels }
    }

    fn quantize(&self, c: u8) -> u8 {
        let n = self.levels.0 as u64;
        if n == 1 {
            // A single level cannot span the range; everything collapses.
            return 0;
        }
        let step = round_div(c as u64 * (n - 1), 255);
        round_div(step * 255, n - 1) as u8
    }
}

impl PixelTransform for Threshold {
    fn apply(&self, px: Rgb) -> Rgb {
        Rgb::new(
            self.quantize(px.blue),
            self.quantize(px.green),
            self.quantize(px.red),
        )
    }
}

// ── Kernel filters ──────────────────────────────────────────────────

/// Channel sums over the `k×k` neighborhood centered on `(x, y)`,
/// zero-filled outside the raster. Accumulates in `u64`: a kernel covering
/// more than ~16.8M pixels would overflow a 32-bit sum.
fn box_sum(src: &Raster, x: usize, y: usize, radius: i64) -> (u64, u64, u64) {
    let (mut b, mut g, mut r) = (0u64, 0u64, 0u64);
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let px = src.sample_zero(x as i64 + dx, y as i64 + dy);
            b += px.blue as u64;
            g += px.green as u64;
            r += px.red as u64;
        }
    }
    (b, g, r)
}

/// `boxblur:k` — unweighted mean of the `k×k` neighborhood per channel.
///
/// The denominator stays `k²` at the border, consistent with zero-fill
/// sampling (edges darken rather than stretch).
pub struct BoxBlur {
    size: KernelSize,
}

impl BoxBlur {
    pub fn new(size: KernelSize) -> Self {
        Self { size }
    }
}

impl KernelTransform for BoxBlur {
    fn apply(&self, src: &Raster, x: usize, y: usize) -> Rgb {
        let (b, g, r) = box_sum(src, x, y, self.size.radius());
        let kk = (self.size.0 * self.size.0) as u64;
        Rgb::new(
            round_div(b, kk) as u8,
            round_div(g, kk) as u8,
            round_div(r, kk) as u8,
        )
    }
}

/// `unsharp:k,s` — original plus `s`% of the difference between the
/// original and its `k×k` box blur, clamped.
pub struct Unsharp {
    size: KernelSize,
    strength: Strength,
}

impl Unsharp {
    pub fn new(size: KernelSize, strength: Strength) -> Self {
        Self { size, strength }
    }

    fn sharpen(&self, orig: u8, mean: f64) -> u8 {
        let v = orig as f64 + self.strength.factor() * (orig as f64 - mean);
        (v + 0.5).floor().clamp(0.0, 255.0) as u8
    }
}

impl KernelTransform for Unsharp {
    fn apply(&self, src: &Raster, x: usize, y: usize) -> Rgb {
        let orig = src.sample_zero(x as i64, y as i64);
        let (b, g, r) = box_sum(src, x, y, self.size.radius());
        let kk = (self.size.0 * self.size.0) as f64;
        Rgb::new(
            self.sharpen(orig.blue, b as f64 / kk),
            self.sharpen(orig.green, g as f64 / kk),
            self.sharpen(orig.red, r as f64 / kk),
        )
    }
}

// ── Registry ────────────────────────────────────────────────────────

type Constructor = fn(&[String]) -> Result<Filter, FilterError>;

/// Read-only mapping from filter name to constructor.
///
/// Built once at startup and passed into the pipeline explicitly — there is
/// no process-global mutable registry. Constructors parse and validate the
/// step's string parameters; surplus parameters are ignored.
pub struct FilterRegistry {
    entries: BTreeMap<&'static str, Constructor>,
}

impl FilterRegistry {
    /// Registry holding the six built-in filters.
    pub fn builtin() -> Self {
        let mut entries: BTreeMap<&'static str, Constructor> = BTreeMap::new();
        entries.insert("identity", |_| Ok(Filter::Pixel(Box::new(Identity))));
        entries.insert("negative", |_| Ok(Filter::Pixel(Box::new(Negative))));
        entries.insert("grayscale", |_| Ok(Filter::Pixel(Box::new(Grayscale))));
        entries.insert("threshold", |params| {
            let levels = Levels::parse(params, 0)?;
            Ok(Filter::Pixel(Box::new(Threshold::new(levels))))
        });
        entries.insert("boxblur", |params| {
            let size = KernelSize::parse(params, 0)?;
            Ok(Filter::Kernel(Box::new(BoxBlur::new(size))))
        });
        entries.insert("unsharp", |params| {
            let size = KernelSize::parse(params, 0)?;
            let strength = Strength::parse(params, 1)?;
            Ok(Filter::Kernel(Box::new(Unsharp::new(size, strength))))
        });
        Self { entries }
    }

    /// Look up `name` and construct the filter from its parameters.
    pub fn resolve(&self, name: &str, params: &[String]) -> Result<Filter, FilterError> {
        let ctor = self
            .entries
            .get(name)
            .ok_or_else(|| FilterError::UnknownFilter(name.to_string()))?;
        ctor(params)
    }

    /// Registered filter names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }
}
