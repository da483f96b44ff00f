//! Configuration types deserialized from `nnhdl.toml`.

use nnhdl_common::RoundingMode;
use serde::Deserialize;
use std::collections::BTreeMap;

/// The top-level translation configuration parsed from `nnhdl.toml`.
///
/// Every section is optional; an empty file yields 16-bit values with 8
/// fractional bits, strict rounding, the `work` library and `auto` ROM style.
#[derive(Debug, Default, Deserialize)]
pub struct TranslationConfig {
    /// Global fixed-point defaults.
    #[serde(default)]
    pub fixed_point: FixedPointSection,
    /// Global design-emission settings.
    #[serde(default)]
    pub design: DesignSection,
    /// Per-layer overrides keyed by node name.
    #[serde(default)]
    pub layers: BTreeMap<String, LayerOverride>,
}

/// Default fixed-point format applied to every layer without an override.
#[derive(Debug, Clone, Deserialize)]
pub struct FixedPointSection {
    /// Total bit width of every encoded value.
    #[serde(default = "default_total_bits")]
    pub total_bits: u32,
    /// Number of fractional bits.
    #[serde(default = "default_frac_bits")]
    pub frac_bits: u32,
    /// Handling of values that are not exactly representable.
    #[serde(default)]
    pub rounding: RoundingMode,
}

fn default_total_bits() -> u32 {
    16
}

fn default_frac_bits() -> u32 {
    8
}

impl Default for FixedPointSection {
    fn default() -> Self {
        Self {
            total_bits: default_total_bits(),
            frac_bits: default_frac_bits(),
            rounding: RoundingMode::default(),
        }
    }
}

/// Settings that shape the emitted VHDL.
#[derive(Debug, Clone, Deserialize)]
pub struct DesignSection {
    /// The VHDL library the generated entities are compiled into.
    #[serde(default = "default_work_library")]
    pub work_library: String,
    /// Implementation style requested for generated ROMs.
    #[serde(default)]
    pub resource_option: ResourceOption,
}

fn default_work_library() -> String {
    "work".to_string()
}

impl Default for DesignSection {
    fn default() -> Self {
        Self {
            work_library: default_work_library(),
            resource_option: ResourceOption::default(),
        }
    }
}

/// Synthesis hint for how ROM contents are implemented.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceOption {
    /// Let the synthesis tool decide (default).
    #[default]
    Auto,
    /// Map to distributed (LUT) memory.
    Distributed,
    /// Map to block RAM.
    Block,
}

impl ResourceOption {
    /// Returns the value written into the `rom_style` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceOption::Auto => "auto",
            ResourceOption::Distributed => "distributed",
            ResourceOption::Block => "block",
        }
    }
}

/// Settings overriding the global defaults for a single layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayerOverride {
    /// Overrides [`FixedPointSection::total_bits`].
    pub total_bits: Option<u32>,
    /// Overrides [`FixedPointSection::frac_bits`].
    pub frac_bits: Option<u32>,
    /// Overrides [`FixedPointSection::rounding`].
    pub rounding: Option<RoundingMode>,
    /// Overrides [`DesignSection::resource_option`].
    pub resource_option: Option<ResourceOption>,
}
