//! Duplicate data rows.
//!
//! Rows are compared on every usable submitted column except the sample
//! number, QC flags and comments, which legitimately differ between
//! repeated measurements.

use std::collections::HashMap;

use dsg_core::StdUserDataArray;
use dsg_model::{DataType, Diagnostic, Severity};
use dsg_standards::names;

pub fn check(data: &StdUserDataArray) -> Vec<Diagnostic> {
    let array = data.array();
    let key_columns: Vec<usize> = (0..data.num_user_columns())
        .filter(|&col| array.is_usable(col) && is_key_type(&array.data_types()[col]))
        .collect();
    if key_columns.is_empty() {
        return Vec::new();
    }

    let mut first_seen: HashMap<Vec<Option<String>>, usize> = HashMap::new();
    let mut diagnostics = Vec::new();
    for index in 0..data.num_samples() {
        let key: Vec<Option<String>> = key_columns
            .iter()
            .map(|&col| array.value(index, col).map(ToString::to_string))
            .collect();
        if key.iter().all(Option::is_none) {
            continue;
        }
        let row_number = data.row_number(index);
        match first_seen.get(&key) {
            Some(&first) => diagnostics.push(
                Diagnostic::new(Severity::Error, "duplicate data row")
                    .with_detail(format!("duplicate of row {first}"))
                    .at_row(row_number),
            ),
            None => {
                first_seen.insert(key, row_number);
            }
        }
    }
    diagnostics
}

fn is_key_type(data_type: &DataType) -> bool {
    !data_type.name_matches(names::SAMPLE_NUMBER)
        && !data_type.name_matches(names::WOCE_AUTOCHECK)
        && !data_type.is_qc_type()
        && !data_type.is_comment_type()
}
