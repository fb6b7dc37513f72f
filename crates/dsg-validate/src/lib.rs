//! Data checks for standardized submissions.
//!
//! [`standardize`] is the full pipeline: raw rows are standardized, the
//! checks in [`checks`] run over the result, and every row with an error
//! gets a bad automated QC flag. The returned [`Standardized`] carries
//! the data, all diagnostics and an overall [`CheckStatus`].

pub mod autocheck;
pub mod checks;
pub mod status;

use std::time::Instant;

use dsg_core::{ColumnAssignment, Result, StandardizeOptions, StdUserDataArray};
use dsg_model::{Diagnostic, SeverityCounts};
use dsg_standards::Registries;
use tracing::{info, info_span};

pub use autocheck::apply_automated_qc;
pub use checks::run_all;
pub use status::CheckStatus;

/// A checked submission.
#[derive(Debug, Clone)]
pub struct Standardized {
    pub data: StdUserDataArray,
    pub status: CheckStatus,
}

impl Standardized {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.data.diagnostics()
    }

    pub fn severity_counts(&self) -> SeverityCounts {
        SeverityCounts::from_diagnostics(self.data.diagnostics())
    }
}

/// Standardizes raw rows and runs every data check over them.
pub fn standardize(
    rows: &[Vec<String>],
    assignments: &[ColumnAssignment],
    registries: &Registries,
    options: &StandardizeOptions,
) -> Result<Standardized> {
    let mut data = StdUserDataArray::standardize(rows, assignments, registries, options)?;

    let span = info_span!("check", rows = data.num_samples());
    let _guard = span.enter();
    let start = Instant::now();
    run_all(&mut data, options);
    apply_automated_qc(&mut data)?;
    let status = CheckStatus::from_diagnostics(data.diagnostics());
    info!(
        %status,
        diagnostics = data.diagnostics().len(),
        duration_ms = start.elapsed().as_millis(),
        "checked data"
    );
    Ok(Standardized { data, status })
}
