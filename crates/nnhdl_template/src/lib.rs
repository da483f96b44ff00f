//! Template engine for turning concrete prototype text into reusable templates.
//!
//! A prototype is ordinary text, typically a working VHDL file. Registered
//! [parameter types](TemplateParameterType) describe, by regular expression,
//! which parts of the prototype become named placeholders. Building runs two
//! passes over the prototype:
//!
//! 1. **Analysis**: [`AnalysingTemplateParameterType`]s scan the prototype
//!    first so their substitution pattern can depend on what they found
//!    (e.g. the name of the first declared entity).
//! 2. **Substitution**: every registered pattern is combined into one
//!    alternation in registration order; each match is replaced by the text
//!    its parameter type returns, usually a `$name` placeholder.
//!
//! The result is an immutable [`Template`] that can be rendered many times.
//!
//! # Usage
//!
//! ```ignore
//! use nnhdl_template::{Literal, ParameterType, TemplateBuilder, TemplateParameters};
//!
//! let template = TemplateBuilder::new()
//!     .set_prototype("constant WIDTH : integer := 16;")
//!     .add_parameter("width", ParameterType::plain(Literal::new("16")))
//!     .build()?;
//! let mut mapping = TemplateParameters::new();
//! mapping.insert("width".to_string(), 8.into());
//! assert_eq!(template.render(&mapping)?, "constant WIDTH : integer := 8;");
//! ```

#![warn(missing_docs)]

mod builder;
mod error;
mod parameter;
mod template;

pub use builder::TemplateBuilder;
pub use error::TemplateError;
pub use parameter::{
    placeholder, AnalysingTemplateParameterType, Literal, ParameterMatch, ParameterType,
    TemplateParameterType,
};
pub use template::{Template, TemplateParameters, TemplateValue};
