//! Shape-preserving quantization of nested parameter sequences.
//!
//! Weight matrices arrive as lists of rows; quantizing them must return lists
//! of rows of the same shape. The [`Quantize`] trait recurses structurally, so
//! `Vec<Vec<f64>>` maps to `Vec<Vec<i64>>`.

use crate::error::FixedPointError;
use crate::fixed_point::{quantize, FixedPointConfig, RoundingMode};

/// A value, or a nested sequence of values, that can be fixed-point encoded.
pub trait Quantize {
    /// The encoded form, with the same nesting as `Self`.
    type Output;

    /// Encodes every scalar in `self`, stopping at the first failure.
    fn quantize(
        &self,
        config: &FixedPointConfig,
        mode: RoundingMode,
    ) -> Result<Self::Output, FixedPointError>;
}

impl Quantize for f64 {
    type Output = i64;

    fn quantize(&self, config: &FixedPointConfig, mode: RoundingMode) -> Result<i64, FixedPointError> {
        quantize(*self, config, mode)
    }
}

impl Quantize for f32 {
    type Output = i64;

    fn quantize(&self, config: &FixedPointConfig, mode: RoundingMode) -> Result<i64, FixedPointError> {
        quantize(f64::from(*self), config, mode)
    }
}

impl<T: Quantize> Quantize for [T] {
    type Output = Vec<T::Output>;

    fn quantize(
        &self,
        config: &FixedPointConfig,
        mode: RoundingMode,
    ) -> Result<Self::Output, FixedPointError> {
        self.iter().map(|item| item.quantize(config, mode)).collect()
    }
}

impl<T: Quantize> Quantize for Vec<T> {
    type Output = Vec<T::Output>;

    fn quantize(
        &self,
        config: &FixedPointConfig,
        mode: RoundingMode,
    ) -> Result<Self::Output, FixedPointError> {
        self.as_slice().quantize(config, mode)
    }
}

impl<T: Quantize, const N: usize> Quantize for [T; N] {
    type Output = Vec<T::Output>;

    fn quantize(
        &self,
        config: &FixedPointConfig,
        mode: RoundingMode,
    ) -> Result<Self::Output, FixedPointError> {
        self.as_slice().quantize(config, mode)
    }
}
