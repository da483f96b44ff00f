//! Quantized parameter bundles handed to design assembly.

use crate::error::TranslateError;
use crate::fusion::{check_linear_shape, fuse_batch_norm, BatchNormStats};
use crate::layers::FpLinear;
use nnhdl_common::{FixedPointConfig, Quantize, RoundingMode};
use serde::Serialize;
use tracing::debug;

/// The encoded parameters of one linear layer.
///
/// `weights` holds `out_features` rows of `in_features` integers and `bias`
/// holds `out_features` integers, all within the signed range of
/// `config.total_bits()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterBundle {
    /// The layer name, used as the design name.
    pub name: String,
    /// Number of inputs.
    pub in_features: usize,
    /// Number of outputs.
    pub out_features: usize,
    /// The format the values are encoded in.
    pub config: FixedPointConfig,
    /// Encoded weights, one row per output feature.
    pub weights: Vec<Vec<i64>>,
    /// Encoded bias, one entry per output feature.
    pub bias: Vec<i64>,
}

/// Exports `layer` as a quantized bundle, folding `norm` in first if given.
///
/// A missing bias is exported as zeros. The source layer is only read.
pub fn export_linear(
    name: &str,
    layer: &FpLinear,
    norm: Option<&BatchNormStats>,
    config: FixedPointConfig,
    mode: RoundingMode,
) -> Result<ParameterBundle, TranslateError> {
    check_linear_shape(
        name,
        layer.in_features,
        layer.out_features,
        &layer.weight,
        layer.bias.as_deref(),
    )?;
    let bias = layer
        .bias
        .clone()
        .unwrap_or_else(|| vec![0.0; layer.out_features]);

    let (weight, bias) = match norm {
        Some(norm) => {
            let fused = fuse_batch_norm(name, &layer.weight, &bias, norm)?;
            (fused.weight, fused.bias)
        }
        None => (layer.weight.clone(), bias),
    };

    debug!(
        layer = name,
        fused = norm.is_some(),
        total_bits = config.total_bits(),
        frac_bits = config.frac_bits(),
        "exporting linear parameters"
    );

    Ok(ParameterBundle {
        name: name.to_string(),
        in_features: layer.in_features,
        out_features: layer.out_features,
        config,
        weights: weight.quantize(&config, mode)?,
        bias: bias.quantize(&config, mode)?,
    })
}
