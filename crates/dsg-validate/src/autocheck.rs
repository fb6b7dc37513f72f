//! Automated data QC flags.

use std::collections::{BTreeSet, HashMap};

use dsg_core::{Result, StdUserDataArray};
use dsg_model::woce;
use tracing::info;

/// Flags every row with an error or critical diagnostic as bad.
///
/// Warnings leave the flag alone. Returns the number of rows flagged.
pub fn apply_automated_qc(data: &mut StdUserDataArray) -> Result<usize> {
    let index_of: HashMap<usize, usize> = data
        .row_numbers()
        .iter()
        .enumerate()
        .map(|(index, &number)| (number, index))
        .collect();
    let bad: BTreeSet<usize> = data
        .diagnostics()
        .iter()
        .filter(|diagnostic| diagnostic.severity.is_error())
        .filter_map(|diagnostic| diagnostic.row)
        .filter_map(|row| index_of.get(&row).copied())
        .collect();
    for &index in &bad {
        data.set_autocheck_flag(index, woce::BAD)?;
    }
    info!(rows = bad.len(), "automated QC flags set");
    Ok(bad.len())
}
