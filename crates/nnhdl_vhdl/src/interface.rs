//! Interface variables: the items of generic and port clauses.

use crate::code::CodeLines;
use crate::types::{DataType, Mode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One interface declaration, e.g. `x : in signed(15 downto 0) := 0`.
///
/// Renders inline via [`Display`](fmt::Display); optional parts are omitted
/// when unset, with single spaces between the present tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceVariable {
    /// The declared name.
    pub identifier: String,
    /// The type mark.
    pub variable_type: DataType,
    /// The port mode, absent for generics.
    pub mode: Option<Mode>,
    /// The index constraint, written inside parentheses after the type.
    pub range: Option<String>,
    /// The default value.
    pub value: Option<String>,
}

impl InterfaceVariable {
    /// Creates a declaration with only a name and type.
    pub fn new(identifier: impl Into<String>, variable_type: DataType) -> Self {
        Self {
            identifier: identifier.into(),
            variable_type,
            mode: None,
            range: None,
            value: None,
        }
    }

    /// Sets the port mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Sets the index constraint, e.g. `"DATA_WIDTH-1 downto 0"`.
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    /// Sets the default value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl fmt::Display for InterfaceVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : ", self.identifier)?;
        if let Some(mode) = self.mode {
            write!(f, "{mode} ")?;
        }
        write!(f, "{}", self.variable_type)?;
        if let Some(range) = &self.range {
            write!(f, "({range})")?;
        }
        if let Some(value) = &self.value {
            write!(f, " := {value}")?;
        }
        Ok(())
    }
}

impl CodeLines for InterfaceVariable {
    fn lines(&self) -> Box<dyn Iterator<Item = String> + '_> {
        Box::new(std::iter::once(self.to_string()))
    }
}

/// An item in a generic or port clause: raw text or a structured declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterfaceItem {
    /// Text emitted verbatim.
    Raw(String),
    /// A structured declaration.
    Variable(InterfaceVariable),
}

impl fmt::Display for InterfaceItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceItem::Raw(text) => f.write_str(text),
            InterfaceItem::Variable(var) => write!(f, "{var}"),
        }
    }
}

impl From<&str> for InterfaceItem {
    fn from(text: &str) -> Self {
        InterfaceItem::Raw(text.to_string())
    }
}

impl From<String> for InterfaceItem {
    fn from(text: String) -> Self {
        InterfaceItem::Raw(text)
    }
}

impl From<InterfaceVariable> for InterfaceItem {
    fn from(var: InterfaceVariable) -> Self {
        InterfaceItem::Variable(var)
    }
}
