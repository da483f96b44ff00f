//! Structural VHDL IR for generated hardware descriptions.
//!
//! This crate defines small declarative node types, [`Entity`],
//! [`InterfaceVariable`], [`Process`], [`Architecture`] and [`Library`], that
//! produce VHDL source lines through the [`CodeLines`] trait. Nodes hold no
//! hidden state: producing lines twice yields identical output. Indentation
//! is one tab per nesting level and is part of the output contract.

#![warn(missing_docs)]

pub mod architecture;
pub mod code;
pub mod entity;
pub mod error;
pub mod interface;
pub mod library;
pub mod lookup;
pub mod process;
pub mod types;

pub use architecture::Architecture;
pub use code::{indented, CodeLines};
pub use entity::Entity;
pub use error::LookupTableError;
pub use interface::{InterfaceItem, InterfaceVariable};
pub use library::{Library, LibraryClause};
pub use lookup::precomputed_scalar_function_process;
pub use process::Process;
pub use types::{DataType, Mode};
