//! Folding batch normalization into a preceding linear layer.
//!
//! At inference time a normalization layer is an affine map per output
//! feature, so it can be absorbed into the linear layer's weights and bias:
//!
//! ```text
//! std = sqrt(variance + eps)
//! W'  = W / std                 b'  = (b - mean) / std
//! W'' = scale * W'              b'' = scale * b' + shift    (affine only)
//! ```

use crate::error::TranslateError;
use serde::{Deserialize, Serialize};

fn default_eps() -> f64 {
    1e-5
}

/// Running statistics of a batch-normalization layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchNormStats {
    /// Running mean per output feature.
    pub running_mean: Vec<f64>,
    /// Running variance per output feature.
    pub running_var: Vec<f64>,
    /// Added to the variance before taking the root.
    #[serde(default = "default_eps")]
    pub eps: f64,
    /// Learned affine parameters, if the layer has them.
    #[serde(default)]
    pub affine: Option<AffineParams>,
}

/// The learned scale and shift of an affine normalization layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffineParams {
    /// Per-feature scale.
    pub weight: Vec<f64>,
    /// Per-feature shift.
    pub bias: Vec<f64>,
}

/// Weights and bias after folding.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedParameters {
    /// One row of `in_features` weights per output feature.
    pub weight: Vec<Vec<f64>>,
    /// One bias per output feature.
    pub bias: Vec<f64>,
}

fn shape_error(layer: &str, message: String) -> TranslateError {
    TranslateError::Shape {
        layer: layer.to_string(),
        message,
    }
}

fn check_len(layer: &str, what: &str, expected: usize, actual: usize) -> Result<(), TranslateError> {
    if expected == actual {
        Ok(())
    } else {
        Err(shape_error(
            layer,
            format!("expected {expected} {what} values, got {actual}"),
        ))
    }
}

/// Checks that both feature counts are positive, that `weight` is
/// `out_features` rows of `in_features` columns and that `bias`, if present,
/// has `out_features` entries.
pub fn check_linear_shape(
    layer: &str,
    in_features: usize,
    out_features: usize,
    weight: &[Vec<f64>],
    bias: Option<&[f64]>,
) -> Result<(), TranslateError> {
    if in_features == 0 || out_features == 0 {
        return Err(shape_error(
            layer,
            format!("feature counts must be positive, got {in_features} in and {out_features} out"),
        ));
    }
    if weight.len() != out_features {
        return Err(shape_error(
            layer,
            format!("expected {out_features} weight rows, got {}", weight.len()),
        ));
    }
    if let Some((row, values)) = weight
        .iter()
        .enumerate()
        .find(|(_, values)| values.len() != in_features)
    {
        return Err(shape_error(
            layer,
            format!(
                "weight row {row} has {} columns, expected {in_features}",
                values.len()
            ),
        ));
    }
    if let Some(bias) = bias {
        check_len(layer, "bias", out_features, bias.len())?;
    }
    Ok(())
}

/// Folds `norm` into the linear parameters `weight` and `bias`.
///
/// The inputs are not modified. Fails when the statistics do not have one
/// entry per weight row or when `variance + eps` is not positive.
pub fn fuse_batch_norm(
    layer: &str,
    weight: &[Vec<f64>],
    bias: &[f64],
    norm: &BatchNormStats,
) -> Result<FusedParameters, TranslateError> {
    let out_features = weight.len();
    check_len(layer, "bias", out_features, bias.len())?;
    check_len(layer, "running_mean", out_features, norm.running_mean.len())?;
    check_len(layer, "running_var", out_features, norm.running_var.len())?;
    if let Some(affine) = &norm.affine {
        check_len(layer, "affine weight", out_features, affine.weight.len())?;
        check_len(layer, "affine bias", out_features, affine.bias.len())?;
    }

    let mut fused_weight = Vec::with_capacity(out_features);
    let mut fused_bias = Vec::with_capacity(out_features);
    for (feature, row) in weight.iter().enumerate() {
        let denominator = norm.running_var[feature] + norm.eps;
        let positive = denominator.is_finite() && denominator > 0.0;
        if !positive {
            return Err(TranslateError::NonPositiveVariance {
                layer: layer.to_string(),
                feature,
            });
        }
        let std = denominator.sqrt();
        let normed_row = row.iter().map(|w| w / std);
        let normed_bias = (bias[feature] - norm.running_mean[feature]) / std;

        match &norm.affine {
            Some(affine) => {
                let scale = affine.weight[feature];
                fused_weight.push(normed_row.map(|w| scale * w).collect());
                fused_bias.push(scale * normed_bias + affine.bias[feature]);
            }
            None => {
                fused_weight.push(normed_row.collect());
                fused_bias.push(normed_bias);
            }
        }
    }

    Ok(FusedParameters {
        weight: fused_weight,
        bias: fused_bias,
    })
}
