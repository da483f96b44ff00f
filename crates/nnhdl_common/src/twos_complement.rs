//! Fixed-width two's-complement bit strings.
//!
//! Generated ROM contents and constant assignments carry every value as a
//! bit string of exactly `total_bits` characters, most significant bit first.

use crate::error::FixedPointError;
use crate::fixed_point::MAX_TOTAL_BITS;

/// Returns the inclusive signed range `[-2^(n-1), 2^(n-1) - 1]` of an `n`-bit integer.
///
/// # Panics
///
/// Panics if `total_bits` is zero or larger than [`MAX_TOTAL_BITS`].
pub fn signed_range(total_bits: u32) -> (i128, i128) {
    assert!(
        (1..=MAX_TOTAL_BITS).contains(&total_bits),
        "bit width {total_bits} out of range"
    );
    let half = 1i128 << (total_bits - 1);
    (-half, half - 1)
}

fn check_width(total_bits: u32) -> Result<(), FixedPointError> {
    if (1..=MAX_TOTAL_BITS).contains(&total_bits) {
        Ok(())
    } else {
        Err(FixedPointError::Configuration {
            reason: format!("bit width must be between 1 and {MAX_TOTAL_BITS}, got {total_bits}"),
        })
    }
}

/// Encodes `value` as a `total_bits`-wide two's-complement bit string.
///
/// Negative values are written as `(1 << total_bits) + value`. Values outside
/// the signed range of the width are rejected, never wrapped.
pub fn to_twos_complement(value: i64, total_bits: u32) -> Result<String, FixedPointError> {
    check_width(total_bits)?;
    let value = i128::from(value);
    let (min, max) = signed_range(total_bits);
    if value < min || value > max {
        return Err(FixedPointError::Range { value, total_bits });
    }
    let unsigned = if value < 0 {
        (1i128 << total_bits) + value
    } else {
        value
    };
    Ok(format!("{unsigned:0width$b}", width = total_bits as usize))
}

/// Reads a two's-complement bit string back into a signed integer.
///
/// The width of the string is the bit width of the number.
pub fn from_twos_complement(bits: &str) -> Result<i64, FixedPointError> {
    let invalid = || FixedPointError::InvalidBitString {
        bits: bits.to_string(),
    };
    let width = bits.len() as u32;
    if width == 0 || width > MAX_TOTAL_BITS || !bits.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(invalid());
    }
    let unsigned = u128::from_str_radix(bits, 2).map_err(|_| invalid())? as i128;
    let value = if bits.starts_with('1') {
        unsigned - (1i128 << width)
    } else {
        unsigned
    };
    i64::try_from(value).map_err(|_| invalid())
}
