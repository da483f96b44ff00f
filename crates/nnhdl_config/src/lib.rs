//! Parsing and validation of `nnhdl.toml` translation settings.
//!
//! This crate reads the translation configuration file and produces a
//! strongly-typed [`TranslationConfig`] with global fixed-point and design
//! defaults plus per-layer overrides, resolved into a [`ResolvedLayer`] for
//! each layer being translated.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{check_layer_names, resolve_layer, ResolvedLayer};
pub use types::*;
