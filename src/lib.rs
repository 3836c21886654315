//! # bmpfx
//!
//! A multithreaded filter pipeline for uncompressed 24-bit BMP images:
//! decode into a pixel buffer, apply an ordered chain of named filters
//! across worker threads, re-encode. Output is bit-identical for any
//! thread count.
//!
//! # Architecture
//!
//! ```text
//! bytes ──codec──▶ Raster ──pipeline──▶ filters (band-parallel) ──codec──▶ bytes
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`raster`] | Pixel buffer: row-stride/padding arithmetic, bounds-checked pixel and section access |
//! | [`codec`] | BMP-24 header validation, decode/encode with verbatim preamble pass-through |
//! | [`filters`] | Transform traits, the built-in catalog, and the rayon band engine |
//! | [`pipeline`] | `name[:p1,p2]` spec parsing and sequenced stop-on-first-failure application |
//!
//! # Design Decisions
//!
//! ## Native Buffer Layout
//!
//! The raster keeps the file's own layout — bottom-up rows, each padded to
//! a 4-byte boundary — instead of normalizing to a tightly packed top-down
//! buffer. Decode is a single validated copy, encode only re-zeroes the
//! padding, and the engine can hand each worker a whole band of rows as one
//! disjoint `&mut [u8]`.
//!
//! ## Snapshot Discipline for Kernel Filters
//!
//! A kernel filter's read window crosses band boundaries, so reading the
//! buffer being written would race. The engine clones the raster into a
//! frozen snapshot before the run; workers read only the snapshot and
//! write only their own band. This is a correctness requirement, not an
//! optimization — it is what makes output independent of thread count.
//!
//! ## Explicit Registry
//!
//! Filters are resolved through a [`filters::FilterRegistry`] value built
//! once at startup and passed into the pipeline. There is no process-global
//! mutable table; after construction the registry is only ever read.

pub mod codec;
pub mod filters;
pub mod pipeline;
pub mod raster;

#[cfg(test)]
pub(crate) mod test_helpers;
