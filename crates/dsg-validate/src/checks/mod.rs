//! Validation check modules.
//!
//! Each module inspects a standardized submission and returns the
//! diagnostics it found; [`run_all`] appends them to the submission.

mod bounds;
mod duplicates;
mod geoposition;
mod metadata;
mod order;

use dsg_core::{StandardizeOptions, StdUserDataArray};
use dsg_model::Diagnostic;
use tracing::debug;

/// Run all validation checks on a standardized submission.
pub fn run_all(data: &mut StdUserDataArray, options: &StandardizeOptions) {
    let mut found: Vec<Diagnostic> = Vec::new();

    // 1. Missing longitudes, latitudes and sample times
    found.extend(geoposition::check(data));

    // 2. Values outside the reasonable and acceptable ranges
    found.extend(bounds::check(data));

    // 3. Repeated data rows
    found.extend(duplicates::check(data));

    // 4. Time order and ship speed
    found.extend(order::check(data, options));

    // 5. Metadata columns with more than one value
    found.extend(metadata::check(data));

    debug!(count = found.len(), "validation checks finished");
    for diagnostic in found {
        data.push_diagnostic(diagnostic);
    }
}

/// Header of a 0-based column, for attaching diagnostics.
fn header(data: &StdUserDataArray, col: usize) -> String {
    data.headers().get(col).cloned().unwrap_or_default()
}

/// Index of the usable column holding `name`.
fn usable_column(data: &StdUserDataArray, name: &str) -> Option<usize> {
    let array = data.array();
    array.column_index(name).filter(|&col| array.is_usable(col))
}
