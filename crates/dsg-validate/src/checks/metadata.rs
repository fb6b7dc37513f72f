//! Metadata-type columns must hold a single value for the whole dataset.

use dsg_core::StdUserDataArray;
use dsg_model::{DataValue, Diagnostic, MAX_ABSOLUTE_ERROR, Role, Severity, close_to};

use super::header;

pub fn check(data: &StdUserDataArray) -> Vec<Diagnostic> {
    let array = data.array();
    let mut diagnostics = Vec::new();
    for col in 0..data.num_user_columns() {
        let data_type = &array.data_types()[col];
        if !array.is_usable(col) || !data_type.has_role(Role::FileMetadata) {
            continue;
        }
        let mut reference: Option<&DataValue> = None;
        for (index, value) in array.column_values(col).enumerate() {
            let Some(value) = value else {
                continue;
            };
            let Some(first) = reference else {
                reference = Some(value);
                continue;
            };
            if same_value(first, value) {
                continue;
            }
            let display = data_type.display_name();
            diagnostics.push(
                Diagnostic::new(Severity::Error, format!("{display} has differing given values"))
                    .with_detail(format!(
                        "{display} has differing given values '{first}' and '{value}'"
                    ))
                    .at_row(data.row_number(index))
                    .at_column(col + 1, header(data, col)),
            );
        }
    }
    diagnostics
}

fn same_value(first: &DataValue, second: &DataValue) -> bool {
    match (first, second) {
        (DataValue::Double(a), DataValue::Double(b)) => close_to(*a, *b, 0.0, MAX_ABSOLUTE_ERROR),
        _ => first == second,
    }
}
