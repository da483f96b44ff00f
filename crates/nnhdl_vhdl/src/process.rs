//! Process statements wrapping a generated lookup-table body.

use crate::code::CodeLines;
use serde::{Deserialize, Serialize};
use std::iter;

/// A VHDL process labelled `<identifier>_process`.
///
/// The body is the sequential statements followed by the lookup-table lines
/// produced by a generator such as
/// [`precomputed_scalar_function_process`](crate::lookup::precomputed_scalar_function_process).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// The label stem.
    pub identifier: String,
    /// The sensitivity list, written verbatim.
    pub input: String,
    /// Declarations before `begin`, without trailing `;`.
    pub item_declarations: Vec<String>,
    /// Sequential statements after `begin`, without trailing `;`.
    pub sequential_statements: Vec<String>,
    /// Pre-formatted lookup-table lines, each indented one level.
    pub lookup_table: Vec<String>,
}

impl Process {
    /// Creates a process with an empty body.
    pub fn new(identifier: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            input: input.into(),
            ..Default::default()
        }
    }

    /// Sets the lookup-table body.
    pub fn with_lookup_table(mut self, lines: Vec<String>) -> Self {
        self.lookup_table = lines;
        self
    }

    /// Appends a declaration.
    pub fn with_declaration(mut self, declaration: impl Into<String>) -> Self {
        self.item_declarations.push(declaration.into());
        self
    }

    /// Appends a sequential statement.
    pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
        self.sequential_statements.push(statement.into());
        self
    }
}

impl CodeLines for Process {
    fn lines(&self) -> Box<dyn Iterator<Item = String> + '_> {
        Box::new(
            iter::once(format!("{}_process: process({})", self.identifier, self.input))
                .chain(self.item_declarations.iter().map(|d| format!("\t{d};")))
                .chain(iter::once("begin".to_string()))
                .chain(self.sequential_statements.iter().map(|s| format!("\t{s};")))
                .chain(self.lookup_table.iter().map(|l| format!("\t{l}")))
                .chain(iter::once(format!("end process {}_process;", self.identifier))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::precomputed_scalar_function_process;

    fn constant_zero() -> Vec<String> {
        precomputed_scalar_function_process(&[], &[0], 16).unwrap()
    }

    #[test]
    fn process_empty() {
        let process = Process::new("some_name", "some_input").with_lookup_table(constant_zero());
        assert_eq!(
            process.to_lines(),
            vec![
                "some_name_process: process(some_input)",
                "begin",
                "\ty <= \"0000000000000000\";",
                "end process some_name_process;",
            ]
        );
    }

    #[test]
    fn process_with_variables() {
        let process = Process::new("some_name", "some_input")
            .with_lookup_table(constant_zero())
            .with_declaration("variable some_variable_name: integer := 0")
            .with_statement("some_variable_name := to_integer(some_variable_name)");
        assert_eq!(
            process.to_lines(),
            vec![
                "some_name_process: process(some_input)",
                "\tvariable some_variable_name: integer := 0;",
                "begin",
                "\tsome_variable_name := to_integer(some_variable_name);",
                "\ty <= \"0000000000000000\";",
                "end process some_name_process;",
            ]
        );
    }

    #[test]
    fn lookup_chain_nests_one_level_deeper() {
        let table = precomputed_scalar_function_process(&[0], &[-1, 1], 4).unwrap();
        let lines = Process::new("sign", "x").with_lookup_table(table).to_lines();
        assert_eq!(lines[2], "\tif int_x<0 then");
        assert_eq!(lines[3], "\t\ty <= \"1111\"; -- -1");
        assert_eq!(lines.last().unwrap(), "end process sign_process;");
    }
}
