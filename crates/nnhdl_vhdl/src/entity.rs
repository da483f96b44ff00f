//! Entity declarations.

use crate::code::CodeLines;
use crate::interface::InterfaceItem;
use serde::{Deserialize, Serialize};
use std::iter;

/// A VHDL entity declaration with optional generic and port clauses.
///
/// An empty name is accepted and rendered as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// The entity name.
    pub name: String,
    /// Items of the `generic` clause.
    pub generics: Vec<InterfaceItem>,
    /// Items of the `port` clause.
    pub ports: Vec<InterfaceItem>,
}

impl Entity {
    /// Creates an entity without generics or ports.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Appends a generic.
    pub fn with_generic(mut self, item: impl Into<InterfaceItem>) -> Self {
        self.generics.push(item.into());
        self
    }

    /// Appends a port.
    pub fn with_port(mut self, item: impl Into<InterfaceItem>) -> Self {
        self.ports.push(item.into());
        self
    }
}

/// Emits `\t<keyword> (`, the items separated by `;`, and `\t);`, or nothing
/// for an empty clause.
fn interface_clause<'a>(
    keyword: &'static str,
    items: &'a [InterfaceItem],
) -> impl Iterator<Item = String> + 'a {
    let last = items.len().saturating_sub(1);
    let clause = (!items.is_empty()).then(move || {
        iter::once(format!("\t{keyword} ("))
            .chain(items.iter().enumerate().map(move |(i, item)| {
                if i == last {
                    format!("\t\t{item}")
                } else {
                    format!("\t\t{item};")
                }
            }))
            .chain(iter::once("\t);".to_string()))
    });
    clause.into_iter().flatten()
}

impl CodeLines for Entity {
    fn lines(&self) -> Box<dyn Iterator<Item = String> + '_> {
        Box::new(
            iter::once(format!("entity {} is", self.name))
                .chain(interface_clause("generic", &self.generics))
                .chain(interface_clause("port", &self.ports))
                .chain(iter::once(format!("end entity {};", self.name))),
        )
    }
}
