//! The line-producing contract shared by all IR nodes.

/// A node that renders to VHDL source lines.
///
/// Every call returns a fresh iterator derived only from the node's current
/// fields, so a node can be rendered any number of times.
pub trait CodeLines {
    /// Produces the node's lines, without trailing newlines.
    fn lines(&self) -> Box<dyn Iterator<Item = String> + '_>;

    /// Collects [`lines`](Self::lines) into a vector.
    fn to_lines(&self) -> Vec<String> {
        self.lines().collect()
    }
}

/// Prefixes every line with one tab.
pub fn indented<'a>(lines: impl Iterator<Item = String> + 'a) -> impl Iterator<Item = String> + 'a {
    lines.map(|line| format!("\t{line}"))
}
