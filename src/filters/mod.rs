//! Filter execution: transform traits, the built-in catalog, and the
//! band-parallel engine.
//!
//! The module is split into:
//! - **Params**: validated parameter newtypes parsed from CLI strings
//! - **Engine**: [`Engine`] — rayon-backed row-band execution, identical
//!   output for any thread count
//! - **Catalog**: [`PixelTransform`]/[`KernelTransform`] implementations and
//!   the name → constructor [`FilterRegistry`]

pub mod catalog;
pub mod engine;
mod params;

pub use catalog::{Filter, FilterRegistry, KernelTransform, PixelTransform};
pub use engine::Engine;
pub use params::{KernelSize, Levels, Strength};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("unknown filter '{0}'")]
    UnknownFilter(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
