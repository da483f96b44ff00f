//! Translation of quantized neural-network layers into fixed-point VHDL.
//!
//! Layers ([`FpLinear`], [`FpBatchNormedLinear`], [`FpLookupTable`]) are
//! exported to integer [`ParameterBundle`]s with the fixed-point codec, then
//! assembled into [`Design`]s: the linear layer and its ROMs are rendered from
//! prototype templates, the lookup table is built from the structural IR.
//! [`translate_graph`] drives a whole [`ModelGraph`] with settings resolved
//! from the translation configuration.

#![warn(missing_docs)]

pub mod design;
pub mod error;
pub mod export;
pub mod fusion;
pub mod graph;
pub mod layers;
pub mod params;
pub mod prototypes;

pub use design::{address_width, check_identifier, rom_file, CodeFile, Design, FpLinearDesign, LookupTableDesign};
pub use error::TranslateError;
pub use export::{export_linear, ParameterBundle};
pub use fusion::{check_linear_shape, fuse_batch_norm, AffineParams, BatchNormStats, FusedParameters};
pub use graph::{translate_graph, ModelDescription, ModelGraph, Node, NodeDescription};
pub use layers::{FpBatchNormedLinear, FpLinear, FpLookupTable, Layer, Translatable};
pub use params::{ArrayLiteral, AttributeValue, EntityName, GenericDefault};
