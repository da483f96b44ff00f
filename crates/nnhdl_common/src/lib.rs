//! Shared numeric foundations for the nnhdl translation pipeline.
//!
//! This crate provides the fixed-point codec: validated bit-width
//! configurations, float-to-integer quantization with strict or truncating
//! rounding, shape-preserving quantization of nested parameter sequences, and
//! fixed-width two's-complement bit strings. It also holds the VHDL
//! identifier rule that both configuration and design assembly enforce.

#![warn(missing_docs)]

pub mod error;
pub mod fixed_point;
pub mod ident;
pub mod quantize;
pub mod twos_complement;

pub use error::FixedPointError;
pub use fixed_point::{decode, quantize, FixedPointConfig, RoundingMode, MAX_TOTAL_BITS};
pub use ident::is_basic_identifier;
pub use quantize::Quantize;
pub use twos_complement::{from_twos_complement, signed_range, to_twos_complement};
