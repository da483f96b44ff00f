//! Translatable layer types.

use crate::design::{Design, FpLinearDesign, LookupTableDesign};
use crate::error::TranslateError;
use crate::export::export_linear;
use crate::fusion::BatchNormStats;
use nnhdl_common::Quantize;
use nnhdl_config::ResolvedLayer;
use serde::{Deserialize, Serialize};

/// A layer that has a hardware equivalent.
///
/// Implementations only read their parameters, so one layer can be
/// translated any number of times, from any thread.
pub trait Translatable: Send + Sync {
    /// Produces the design named `name` using the resolved `settings`.
    fn translate(&self, name: &str, settings: &ResolvedLayer) -> Result<Design, TranslateError>;
}

/// A fully connected layer `y = W x + b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FpLinear {
    /// Number of inputs.
    pub in_features: usize,
    /// Number of outputs.
    pub out_features: usize,
    /// `out_features` rows of `in_features` weights.
    pub weight: Vec<Vec<f64>>,
    /// One bias per output; absent means zero.
    #[serde(default)]
    pub bias: Option<Vec<f64>>,
}

impl Translatable for FpLinear {
    fn translate(&self, name: &str, settings: &ResolvedLayer) -> Result<Design, TranslateError> {
        let bundle = export_linear(name, self, None, settings.fixed_point, settings.rounding)?;
        FpLinearDesign::from_bundle(&bundle, settings).build()
    }
}

/// A linear layer followed by batch normalization, folded into one linear
/// design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FpBatchNormedLinear {
    /// The linear part.
    #[serde(flatten)]
    pub linear: FpLinear,
    /// The normalization statistics.
    pub norm: BatchNormStats,
}

impl Translatable for FpBatchNormedLinear {
    fn translate(&self, name: &str, settings: &ResolvedLayer) -> Result<Design, TranslateError> {
        let bundle = export_linear(
            name,
            &self.linear,
            Some(&self.norm),
            settings.fixed_point,
            settings.rounding,
        )?;
        FpLinearDesign::from_bundle(&bundle, settings).build()
    }
}

/// A scalar activation sampled as a step function.
///
/// Inputs below `breakpoints[i]` (after sorting) and at or above the previous
/// breakpoint map to `outputs[i]`; inputs at or above the last breakpoint map
/// to the last output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FpLookupTable {
    /// Interval boundaries in real units.
    pub breakpoints: Vec<f64>,
    /// One output per interval in real units.
    pub outputs: Vec<f64>,
}

impl Translatable for FpLookupTable {
    fn translate(&self, name: &str, settings: &ResolvedLayer) -> Result<Design, TranslateError> {
        let config = settings.fixed_point;
        let breakpoints = self.breakpoints.quantize(&config, settings.rounding)?;
        let outputs = self.outputs.quantize(&config, settings.rounding)?;
        LookupTableDesign::new(name, config, breakpoints, outputs).build()
    }
}

/// Any of the built-in layers, tagged by `kind` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layer {
    /// See [`FpLinear`].
    Linear(FpLinear),
    /// See [`FpBatchNormedLinear`].
    BatchNormedLinear(FpBatchNormedLinear),
    /// See [`FpLookupTable`].
    LookupTable(FpLookupTable),
}

impl Translatable for Layer {
    fn translate(&self, name: &str, settings: &ResolvedLayer) -> Result<Design, TranslateError> {
        match self {
            Layer::Linear(layer) => layer.translate(name, settings),
            Layer::BatchNormedLinear(layer) => layer.translate(name, settings),
            Layer::LookupTable(layer) => layer.translate(name, settings),
        }
    }
}
