//! Library and use clauses.

use crate::code::CodeLines;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The standard IEEE preamble every generated file starts with.
const IEEE_PREAMBLE: [&str; 3] = [
    "library ieee;",
    "use ieee.std_logic_1164.all;",
    "use ieee.numeric_std.all;",
];

/// An additional context clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LibraryClause {
    /// `library <name>;`
    Library(String),
    /// `use <selected name>;`
    Use(String),
}

impl fmt::Display for LibraryClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryClause::Library(name) => write!(f, "library {name};"),
            LibraryClause::Use(name) => write!(f, "use {name};"),
        }
    }
}

/// The context clause of a design file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    /// Clauses emitted after the IEEE preamble.
    pub more_libs: Vec<LibraryClause>,
}

impl Library {
    /// Creates a context clause holding only the IEEE preamble.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `library <name>;`.
    pub fn with_library(mut self, name: impl Into<String>) -> Self {
        self.more_libs.push(LibraryClause::Library(name.into()));
        self
    }

    /// Appends `use <name>;`.
    pub fn with_use(mut self, name: impl Into<String>) -> Self {
        self.more_libs.push(LibraryClause::Use(name.into()));
        self
    }
}

impl CodeLines for Library {
    fn lines(&self) -> Box<dyn Iterator<Item = String> + '_> {
        Box::new(
            IEEE_PREAMBLE
                .iter()
                .map(|l| l.to_string())
                .chain(self.more_libs.iter().map(|c| c.to_string())),
        )
    }
}
