//! Plain-text rendering of layers and covers.
//!
//! Every vector is printed on one line: its digits right-aligned in a
//! [`Vector::MAX_LEN`]-wide column, the value character, then the input rows
//! it covers.
//!
//! ```text
//!                               -1 | 1 (01,11)
//!                               0- | - (*)
//! ```

use std::fmt::Write;

use crate::minimizer::Minimizer;
use crate::table::VectorTable;
use crate::vector::Vector;

/// Render one vector of a run.
pub fn render_row(minimizer: &Minimizer, vector: &Vector) -> String {
    let mut out = String::new();
    write_row(&mut out, minimizer, vector);
    out
}

/// Render every vector of `table`, one per line.
pub fn render_table(minimizer: &Minimizer, table: &VectorTable) -> String {
    let mut out = String::new();
    for vector in table {
        write_row(&mut out, minimizer, vector);
        out.push('\n');
    }
    out
}

fn write_row(out: &mut String, minimizer: &Minimizer, vector: &Vector) {
    let mode = minimizer.config().mode;
    // Writing into a String cannot fail.
    let _ = write!(out, "{:>width$} | {} (", vector, vector.outcome_char(mode), width = Vector::MAX_LEN);

    let mut any = false;
    for leaf in minimizer.covered_leaves(vector) {
        if any {
            out.push(',');
        }
        any = true;
        if leaf.outcome().is_one() {
            let _ = write!(out, "{}", leaf);
        } else {
            out.push('*');
        }
    }
    if !any {
        out.push('*');
    }
    out.push(')');
}
