//! Error types for template building and rendering.

/// Errors raised while building or rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// A render mapping has no value for a placeholder used by the template.
    #[error("missing value for template parameter '{name}'")]
    MissingParameter {
        /// The placeholder name without the leading `$`.
        name: String,
    },

    /// A substitution match could not be attributed to any registered
    /// parameter, usually because its pattern lacks the `{value}` group.
    #[error("no registered template parameter matched '{matched}'")]
    UnknownPlaceholder {
        /// The matched prototype text.
        matched: String,
    },

    /// The substituted text contains a `$` that does not start a placeholder.
    #[error("invalid placeholder at line {line}, column {column}")]
    InvalidPlaceholder {
        /// One-based line of the offending `$`.
        line: usize,
        /// One-based column of the offending `$`.
        column: usize,
    },

    /// A combined parameter pattern failed to compile.
    #[error("invalid parameter pattern '{pattern}': {reason}")]
    InvalidRegex {
        /// The combined pattern.
        pattern: String,
        /// The regex compiler's message.
        reason: String,
    },
}
