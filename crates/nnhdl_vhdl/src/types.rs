//! VHDL data types and port modes used in interface declarations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A VHDL type mark for interface variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// `integer`
    Integer,
    /// `natural`
    Natural,
    /// `signed` from `ieee.numeric_std`
    Signed,
    /// `unsigned` from `ieee.numeric_std`
    Unsigned,
    /// `std_logic`
    StdLogic,
    /// `std_logic_vector`
    StdLogicVector,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataType::Integer => "integer",
            DataType::Natural => "natural",
            DataType::Signed => "signed",
            DataType::Unsigned => "unsigned",
            DataType::StdLogic => "std_logic",
            DataType::StdLogicVector => "std_logic_vector",
        })
    }
}

/// The direction of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// `in`
    In,
    /// `out`
    Out,
    /// `inout`
    InOut,
    /// `buffer`
    Buffer,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::In => "in",
            Mode::Out => "out",
            Mode::InOut => "inout",
            Mode::Buffer => "buffer",
        })
    }
}
