//! VHDL identifier rules shared by configuration and design assembly.

/// Whether `name` is a basic VHDL identifier: a letter followed by letters,
/// digits and single underscores, not ending in an underscore.
pub fn is_basic_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.contains("__")
        && !name.ends_with('_')
}
