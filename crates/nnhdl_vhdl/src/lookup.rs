//! Lookup-table bodies for precomputed scalar functions.
//!
//! A scalar activation is approximated by a step function: sorted integer
//! breakpoints `x` split the input domain and each interval maps to one
//! encoded output `y`. The generated body compares `int_x` (the input as an
//! integer) against the breakpoints and drives `y` with a bit-string literal.

use crate::error::LookupTableError;
use nnhdl_common::to_twos_complement;

/// Generates the `if`/`elsif`/`else` chain assigning `y` for each interval.
///
/// `x_list` holds the breakpoints (sorted here) and `y_list` the outputs, one
/// more than breakpoints. With no breakpoints and a single output the body is
/// a constant assignment. Outputs are encoded with `total_bits` bits.
pub fn precomputed_scalar_function_process(
    x_list: &[i64],
    y_list: &[i64],
    total_bits: u32,
) -> Result<Vec<String>, LookupTableError> {
    let mut breakpoints = x_list.to_vec();
    breakpoints.sort_unstable();

    if breakpoints.len() + 1 != y_list.len() {
        return Err(LookupTableError::LengthMismatch {
            breakpoints: breakpoints.len(),
            outputs: y_list.len(),
        });
    }
    if breakpoints.is_empty() {
        let bits = to_twos_complement(y_list[0], total_bits)?;
        return Ok(vec![format!("y <= \"{bits}\";")]);
    }

    let mut lines = Vec::with_capacity(2 * y_list.len() + 2);
    for (i, (x, y)) in breakpoints.iter().zip(y_list).enumerate() {
        let keyword = if i == 0 { "if" } else { "elsif" };
        lines.push(format!("{keyword} int_x<{x} then"));
        lines.push(format!("\ty <= \"{}\"; -- {y}", to_twos_complement(*y, total_bits)?));
    }
    let last = y_list[breakpoints.len()];
    lines.push("else".to_string());
    lines.push(format!("\ty <= \"{}\"; -- {last}", to_twos_complement(last, total_bits)?));
    lines.push("end if;".to_string());
    Ok(lines)
}
