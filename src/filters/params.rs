//! Validated parameter types for the filter catalog.
//!
//! CLI filter parameters arrive as positional strings (`threshold:4`,
//! `unsharp:5,150`). Each newtype here owns the parse-and-validate step so
//! catalog constructors only ever see well-formed values.

use super::FilterError;

fn arg<'a>(params: &'a [String], index: usize, what: &str) -> Result<&'a str, FilterError> {
    params
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| FilterError::InvalidParameter(format!("missing {what}")))
}

/// Quantization level count for `threshold` (≥ 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Levels(pub u32);

impl Levels {
    pub fn parse(params: &[String], index: usize) -> Result<Self, FilterError> {
        let raw = arg(params, index, "level count")?;
        let n: u32 = raw.parse().map_err(|_| {
            FilterError::InvalidParameter(format!("level count '{raw}' is not a positive integer"))
        })?;
        if n < 1 {
            return Err(FilterError::InvalidParameter(
                "level count must be at least 1".into(),
            ));
        }
        Ok(Self(n))
    }
}

/// Kernel side length for neighborhood filters (odd, ≥ 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelSize(pub usize);

impl KernelSize {
    pub fn parse(params: &[String], index: usize) -> Result<Self, FilterError> {
        let raw = arg(params, index, "kernel size")?;
        let k: usize = raw.parse().map_err(|_| {
            FilterError::InvalidParameter(format!("kernel size '{raw}' is not a positive integer"))
        })?;
        if k == 0 || k % 2 == 0 {
            return Err(FilterError::InvalidParameter(format!(
                "kernel size must be a positive odd integer, got {k}"
            )));
        }
        Ok(Self(k))
    }

    /// Neighborhood radius: `(k - 1) / 2`.
    pub fn radius(self) -> i64 {
        (self.0 as i64 - 1) / 2
    }
}

/// Unsharp-mask strength in percent (finite, ≥ 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strength(pub f64);

impl Strength {
    pub fn parse(params: &[String], index: usize) -> Result<Self, FilterError> {
        let raw = arg(params, index, "strength")?;
        let s: f64 = raw.parse().map_err(|_| {
            FilterError::InvalidParameter(format!("strength '{raw}' is not a number"))
        })?;
        if !s.is_finite() || s < 0.0 {
            return Err(FilterError::InvalidParameter(format!(
                "strength must be a non-negative percentage, got {raw}"
            )));
        }
        Ok(Self(s))
    }

    /// Strength as a plain factor (`150` → `1.5`).
    pub fn factor(self) -> f64 {
        self.0 / 100.0
    }
}
