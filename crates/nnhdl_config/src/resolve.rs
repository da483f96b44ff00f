//! Layer resolution: merging global defaults with per-layer overrides.

use crate::error::ConfigError;
use crate::types::{ResourceOption, TranslationConfig};
use nnhdl_common::{FixedPointConfig, RoundingMode};
use std::collections::BTreeSet;

/// The effective settings for translating one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLayer {
    /// The layer (graph node) name.
    pub name: String,
    /// The validated fixed-point format.
    pub fixed_point: FixedPointConfig,
    /// Rounding applied during quantization.
    pub rounding: RoundingMode,
    /// ROM implementation style.
    pub resource_option: ResourceOption,
    /// The VHDL work library name.
    pub work_library: String,
}

/// Resolves the settings of `layer_name`.
///
/// Global defaults form the base and any `[layers.<name>]` entry overrides
/// individual fields. Layers without an entry get the global defaults.
pub fn resolve_layer(
    config: &TranslationConfig,
    layer_name: &str,
) -> Result<ResolvedLayer, ConfigError> {
    let global = &config.fixed_point;
    let layer = config.layers.get(layer_name).cloned().unwrap_or_default();

    let total_bits = layer.total_bits.unwrap_or(global.total_bits);
    let frac_bits = layer.frac_bits.unwrap_or(global.frac_bits);
    let fixed_point = FixedPointConfig::new(total_bits, frac_bits)
        .map_err(|e| ConfigError::ValidationError(format!("layers.{layer_name}: {e}")))?;

    Ok(ResolvedLayer {
        name: layer_name.to_string(),
        fixed_point,
        rounding: layer.rounding.unwrap_or(global.rounding),
        resource_option: layer
            .resource_option
            .unwrap_or(config.design.resource_option),
        work_library: config.design.work_library.clone(),
    })
}

/// Rejects overrides for layers that do not exist in the model.
///
/// A misspelled override would otherwise silently fall back to the global
/// format and produce hardware constants of the wrong width.
pub fn check_layer_names<'a>(
    config: &TranslationConfig,
    known: impl IntoIterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let known: BTreeSet<&str> = known.into_iter().collect();
    match config.layers.keys().find(|name| !known.contains(name.as_str())) {
        Some(unknown) => Err(ConfigError::UnknownLayer(unknown.clone())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    const CONFIG: &str = r#"
[fixed_point]
total_bits = 16
frac_bits = 8

[design]
resource_option = "block"

[layers.fc1]
total_bits = 8
frac_bits = 4
rounding = "truncate"

[layers.fc2]
frac_bits = 2
resource_option = "distributed"
"#;

    #[test]
    fn layer_without_override_gets_defaults() {
        let config = load_config_from_str(CONFIG).unwrap();
        let resolved = resolve_layer(&config, "out").unwrap();
        assert_eq!(resolved.name, "out");
        assert_eq!(resolved.fixed_point, FixedPointConfig::new(16, 8).unwrap());
        assert_eq!(resolved.rounding, RoundingMode::Strict);
        assert_eq!(resolved.resource_option, ResourceOption::Block);
        assert_eq!(resolved.work_library, "work");
    }

    #[test]
    fn full_override() {
        let config = load_config_from_str(CONFIG).unwrap();
        let resolved = resolve_layer(&config, "fc1").unwrap();
        assert_eq!(resolved.fixed_point, FixedPointConfig::new(8, 4).unwrap());
        assert_eq!(resolved.rounding, RoundingMode::Truncate);
        assert_eq!(resolved.resource_option, ResourceOption::Block);
    }

    #[test]
    fn partial_override_merges_with_global() {
        let config = load_config_from_str(CONFIG).unwrap();
        let resolved = resolve_layer(&config, "fc2").unwrap();
        // total_bits from global, frac_bits from the layer
        assert_eq!(resolved.fixed_point, FixedPointConfig::new(16, 2).unwrap());
        assert_eq!(resolved.resource_option, ResourceOption::Distributed);
    }

    #[test]
    fn override_breaking_the_global_width_errors() {
        let mut config = TranslationConfig::default();
        config.layers.insert(
            "tiny".to_string(),
            crate::types::LayerOverride {
                total_bits: Some(4),
                ..Default::default()
            },
        );
        let err = resolve_layer(&config, "tiny").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn known_layer_names_pass() {
        let config = load_config_from_str(CONFIG).unwrap();
        assert!(check_layer_names(&config, ["fc1", "fc2", "relu"]).is_ok());
    }

    #[test]
    fn misspelled_layer_name_errors() {
        let config = load_config_from_str(CONFIG).unwrap();
        let err = check_layer_names(&config, ["fc1", "fc_2"]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownLayer(name) if name == "fc2"));
    }
}
