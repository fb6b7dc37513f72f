//! Every sample needs a longitude, a latitude and a sample time.

use dsg_core::StdUserDataArray;
use dsg_model::{Diagnostic, Severity};
use dsg_standards::names;

use super::{header, usable_column};

pub fn check(data: &StdUserDataArray) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for (name, missing, absent) in [
        (names::LONGITUDE, "missing longitude", "no longitude column"),
        (names::LATITUDE, "missing latitude", "no latitude column"),
    ] {
        let Some(col) = usable_column(data, name) else {
            diagnostics.push(Diagnostic::new(Severity::Critical, absent));
            continue;
        };
        for (index, value) in data.array().column_values(col).enumerate() {
            if value.is_none() {
                diagnostics.push(
                    Diagnostic::new(Severity::Critical, missing)
                        .at_row(data.row_number(index))
                        .at_column(col + 1, header(data, col)),
                );
            }
        }
    }

    let time_columns = data.time_columns();
    if time_columns.is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Critical,
            "missing columns for sample date/time specification",
        ));
        return diagnostics;
    }
    for (index, time) in data.sample_times().iter().enumerate() {
        if time.is_some() {
            continue;
        }
        for &col in &time_columns {
            diagnostics.push(
                Diagnostic::new(Severity::Critical, "invalid sample date/time specification")
                    .at_row(data.row_number(index))
                    .at_column(col + 1, header(data, col)),
            );
        }
    }
    diagnostics
}
