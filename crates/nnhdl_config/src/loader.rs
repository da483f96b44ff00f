//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::resolve::resolve_layer;
use crate::types::TranslationConfig;
use nnhdl_common::{is_basic_identifier, FixedPointConfig};
use std::path::Path;

/// File name looked up inside a project directory.
pub const CONFIG_FILE_NAME: &str = "nnhdl.toml";

/// Loads and validates an `nnhdl.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<TranslationConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates an `nnhdl.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<TranslationConfig, ConfigError> {
    let config: TranslationConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks that the global format and every per-layer format are valid
/// fixed-point configurations and that the work library is a basic VHDL
/// identifier.
fn validate_config(config: &TranslationConfig) -> Result<(), ConfigError> {
    FixedPointConfig::new(config.fixed_point.total_bits, config.fixed_point.frac_bits)
        .map_err(|e| ConfigError::ValidationError(format!("fixed_point: {e}")))?;
    let library = &config.design.work_library;
    if !is_basic_identifier(library) {
        return Err(ConfigError::ValidationError(format!(
            "design.work_library '{library}' is not a VHDL identifier"
        )));
    }
    for name in config.layers.keys() {
        resolve_layer(config, name)?;
    }
    Ok(())
}
