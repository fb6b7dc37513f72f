//! Range checks of every value against the limits of its data type.

use dsg_core::StdUserDataArray;
use dsg_model::Diagnostic;

use super::header;

pub fn check(data: &StdUserDataArray) -> Vec<Diagnostic> {
    let array = data.array();
    let mut diagnostics = Vec::new();
    for (col, data_type) in array.data_types().iter().enumerate() {
        if !array.is_usable(col) {
            continue;
        }
        for (index, value) in array.column_values(col).enumerate() {
            if let Some(diagnostic) = data_type.bounds_check(value) {
                diagnostics.push(
                    diagnostic
                        .at_row(data.row_number(index))
                        .at_column(col + 1, header(data, col)),
                );
            }
        }
    }
    diagnostics
}
