//! Error type for fixed-point conversions.

/// Errors raised while converting numbers to or from fixed-point form.
///
/// None of these are recoverable by retrying: they signal a mismatch between
/// the trained values and the configured hardware number format.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FixedPointError {
    /// The value has no exact representation at the configured fractional
    /// precision (strict rounding only), or is not a finite number.
    #[error("{value} is not representable as a fixed-point number with {frac_bits} fractional bits")]
    Precision {
        /// The offending floating-point value.
        value: f64,
        /// The configured number of fractional bits.
        frac_bits: u32,
    },

    /// The integer falls outside the signed range of the configured width.
    #[error("{value} does not fit into a signed {total_bits}-bit integer")]
    Range {
        /// The offending integer value.
        value: i128,
        /// The configured total bit width.
        total_bits: u32,
    },

    /// The fixed-point configuration itself is invalid.
    #[error("invalid fixed-point configuration: {reason}")]
    Configuration {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// A bit string could not be read back as a two's-complement number.
    #[error("invalid two's-complement bit string '{bits}'")]
    InvalidBitString {
        /// The rejected input.
        bits: String,
    },
}
