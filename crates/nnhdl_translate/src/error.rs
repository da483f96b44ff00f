//! Error type for layer translation.

use nnhdl_common::FixedPointError;
use nnhdl_config::ConfigError;
use nnhdl_template::TemplateError;
use nnhdl_vhdl::LookupTableError;

/// Errors that abort the translation of a layer or model graph.
///
/// Every error reaches the caller unchanged; nothing is downgraded to a
/// warning because the generated text is synthesized as is.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// Parameter tensors disagree with the declared feature counts.
    #[error("layer '{layer}': {message}")]
    Shape {
        /// The layer being translated.
        layer: String,
        /// What did not match.
        message: String,
    },

    /// Normalization statistics would divide by zero or a negative root.
    #[error("layer '{layer}': variance + eps of feature {feature} is not positive")]
    NonPositiveVariance {
        /// The layer being translated.
        layer: String,
        /// The output feature index.
        feature: usize,
    },

    /// A design name cannot be used as a VHDL identifier.
    #[error("'{0}' is not a valid VHDL identifier")]
    InvalidName(String),

    /// The model graph has a cycle and cannot be ordered.
    #[error("model graph contains a cycle through node '{node}'")]
    CyclicGraph {
        /// A node on the cycle.
        node: String,
    },

    /// Two graph nodes share a name.
    #[error("duplicate node '{0}'")]
    DuplicateNode(String),

    /// An edge refers to a node that was never added.
    #[error("unknown node '{0}'")]
    UnknownNode(String),

    /// A serialized model description could not be read.
    #[error("failed to parse model description: {0}")]
    Description(String),

    /// A value could not be encoded at the configured precision or width.
    #[error(transparent)]
    FixedPoint(#[from] FixedPointError),

    /// A design template failed to build or render.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A lookup-table body could not be generated.
    #[error(transparent)]
    LookupTable(#[from] LookupTableError),

    /// Layer settings could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
