//! Error types for generated process bodies.

use nnhdl_common::FixedPointError;

/// Errors raised while generating a lookup-table body.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupTableError {
    /// A piecewise-constant table needs exactly one more output than breakpoints.
    #[error("{breakpoints} breakpoints need {} output values, got {outputs}", .breakpoints + 1)]
    LengthMismatch {
        /// Number of breakpoints.
        breakpoints: usize,
        /// Number of output values.
        outputs: usize,
    },

    /// An output value could not be encoded at the configured width.
    #[error(transparent)]
    FixedPoint(#[from] FixedPointError),
}
