//! Fixed-point number formats and scalar conversion.
//!
//! A [`FixedPointConfig`] describes a signed two's-complement format with
//! `total_bits` bits of which `frac_bits` hold the fractional part. A real
//! number `x` is encoded as the integer `x * 2^frac_bits`.

use crate::error::FixedPointError;
use crate::twos_complement::{signed_range, to_twos_complement};
use serde::{Deserialize, Serialize};

/// Widest supported fixed-point format; encoded values are stored as `i64`.
pub const MAX_TOTAL_BITS: u32 = 64;

/// How scaled values that are not whole numbers are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    /// Reject values that lose precision (default).
    #[default]
    Strict,
    /// Truncate toward zero.
    Truncate,
}

/// A validated signed fixed-point format.
///
/// Construction guarantees `0 < frac_bits < total_bits <= 64`. The type is
/// `Copy` and carries no state beyond the two widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFixedPointConfig")]
pub struct FixedPointConfig {
    total_bits: u32,
    frac_bits: u32,
}

#[derive(Deserialize)]
struct RawFixedPointConfig {
    total_bits: u32,
    frac_bits: u32,
}

impl TryFrom<RawFixedPointConfig> for FixedPointConfig {
    type Error = FixedPointError;

    fn try_from(raw: RawFixedPointConfig) -> Result<Self, Self::Error> {
        Self::new(raw.total_bits, raw.frac_bits)
    }
}

impl FixedPointConfig {
    /// Creates a configuration, rejecting widths that violate
    /// `0 < frac_bits < total_bits <= 64`.
    pub fn new(total_bits: u32, frac_bits: u32) -> Result<Self, FixedPointError> {
        if total_bits > MAX_TOTAL_BITS {
            return Err(FixedPointError::Configuration {
                reason: format!("total_bits must not exceed {MAX_TOTAL_BITS}, got {total_bits}"),
            });
        }
        if frac_bits == 0 {
            return Err(FixedPointError::Configuration {
                reason: "frac_bits must be greater than zero".to_string(),
            });
        }
        if frac_bits >= total_bits {
            return Err(FixedPointError::Configuration {
                reason: format!(
                    "frac_bits ({frac_bits}) must be smaller than total_bits ({total_bits})"
                ),
            });
        }
        Ok(Self {
            total_bits,
            frac_bits,
        })
    }

    /// Returns the total bit width.
    pub fn total_bits(&self) -> u32 {
        self.total_bits
    }

    /// Returns the number of fractional bits.
    pub fn frac_bits(&self) -> u32 {
        self.frac_bits
    }

    /// Returns `2^frac_bits`, the encoding of `1.0`.
    pub fn scale(&self) -> f64 {
        (1u64 << self.frac_bits) as f64
    }

    /// Returns the smallest representable encoded integer.
    pub fn min_value(&self) -> i64 {
        signed_range(self.total_bits).0 as i64
    }

    /// Returns the largest representable encoded integer.
    pub fn max_value(&self) -> i64 {
        signed_range(self.total_bits).1 as i64
    }

    /// Encodes `x` as a fixed-point integer. See [`quantize`].
    pub fn as_integer(&self, x: f64, mode: RoundingMode) -> Result<i64, FixedPointError> {
        quantize(x, self, mode)
    }

    /// Returns the real value represented by the encoded integer `value`.
    pub fn as_real(&self, value: i64) -> f64 {
        decode(value, self)
    }

    /// Encodes `x` and renders it as a `total_bits`-wide two's-complement string.
    pub fn bit_string(&self, x: f64, mode: RoundingMode) -> Result<String, FixedPointError> {
        to_twos_complement(self.as_integer(x, mode)?, self.total_bits)
    }
}

/// Converts `x` to its fixed-point integer encoding `x * 2^frac_bits`.
///
/// In [`RoundingMode::Strict`] a scaled value with a fractional remainder is a
/// [`FixedPointError::Precision`]; in [`RoundingMode::Truncate`] it is truncated
/// toward zero. Non-finite input is always a precision error. The result must
/// fit the signed range of `total_bits`, otherwise [`FixedPointError::Range`].
pub fn quantize(x: f64, config: &FixedPointConfig, mode: RoundingMode) -> Result<i64, FixedPointError> {
    let precision_error = || FixedPointError::Precision {
        value: x,
        frac_bits: config.frac_bits,
    };
    if !x.is_finite() {
        return Err(precision_error());
    }
    let scaled = x * config.scale();
    if mode == RoundingMode::Strict && scaled.fract() != 0.0 {
        return Err(precision_error());
    }
    // `as` saturates, so out-of-range floats still land outside the i64 range below.
    let value = scaled.trunc() as i128;
    let (min, max) = signed_range(config.total_bits);
    if value < min || value > max {
        return Err(FixedPointError::Range {
            value,
            total_bits: config.total_bits,
        });
    }
    Ok(value as i64)
}

/// Returns the rational value `value / 2^frac_bits` as a float.
pub fn decode(value: i64, config: &FixedPointConfig) -> f64 {
    value as f64 / config.scale()
}
