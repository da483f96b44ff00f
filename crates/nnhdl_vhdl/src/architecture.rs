//! Architecture bodies.

use crate::code::{indented, CodeLines};
use crate::process::Process;
use serde::{Deserialize, Serialize};
use std::iter;

/// A VHDL architecture body for an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    /// The architecture name, e.g. `rtl`.
    pub identifier: String,
    /// The entity this architecture implements.
    pub design_unit: String,
    /// Declarations before `begin`, without trailing `;`.
    pub declarations: Vec<String>,
    /// Concurrent statements, without trailing `;`.
    pub statements: Vec<String>,
    /// Processes emitted after the concurrent statements.
    pub processes: Vec<Process>,
}

impl Architecture {
    /// Creates an empty architecture `identifier` of `design_unit`.
    pub fn new(identifier: impl Into<String>, design_unit: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            design_unit: design_unit.into(),
            ..Default::default()
        }
    }

    /// Appends a declaration.
    pub fn with_declaration(mut self, declaration: impl Into<String>) -> Self {
        self.declarations.push(declaration.into());
        self
    }

    /// Appends a concurrent statement.
    pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
        self.statements.push(statement.into());
        self
    }

    /// Appends a process.
    pub fn with_process(mut self, process: Process) -> Self {
        self.processes.push(process);
        self
    }
}

impl CodeLines for Architecture {
    fn lines(&self) -> Box<dyn Iterator<Item = String> + '_> {
        Box::new(
            iter::once(format!(
                "architecture {} of {} is",
                self.identifier, self.design_unit
            ))
            .chain(self.declarations.iter().map(|d| format!("\t{d};")))
            .chain(iter::once("begin".to_string()))
            .chain(self.statements.iter().map(|s| format!("\t{s};")))
            .chain(self.processes.iter().flat_map(|p| indented(p.lines())))
            .chain(iter::once(format!("end architecture {};", self.identifier))),
        )
    }
}
