//! Submission ingestion.
//!
//! A submission is a TOML manifest next to a delimited data file. The
//! manifest names the data file, gives dataset metadata, and assigns data
//! types and units to columns whose headers are not recognized on their
//! own.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let submission = dsg_ingest::load_submission(Path::new("cruise/manifest.toml"))?;
//! let user = submission.standardize()?;
//! let metadata = submission.metadata(&user)?;
//! # Ok::<(), dsg_ingest::IngestError>(())
//! ```

pub mod assign;
pub mod error;
pub mod manifest;
pub mod table;

use std::collections::BTreeSet;
use std::path::Path;

use dsg_core::{ColumnAssignment, MetadataRecord, StdUserDataArray};
use dsg_standards::Registries;
use tracing::{info, info_span, warn};

pub use assign::assign_columns;
pub use error::{IngestError, Result};
pub use manifest::{ColumnSpec, Manifest, load_manifest};
pub use table::{DataTable, TableFormat, read_data_table};

/// A loaded submission with every column assigned.
#[derive(Debug, Clone)]
pub struct Submission {
    pub manifest: Manifest,
    pub registries: Registries,
    pub table: DataTable,
    pub assignments: Vec<ColumnAssignment>,
}

/// Loads the manifest, its type catalog and its data file.
pub fn load_submission(manifest_path: &Path) -> Result<Submission> {
    let span = info_span!("load_submission", manifest = %manifest_path.display());
    let _guard = span.enter();

    let manifest = load_manifest(manifest_path)?;
    let registries = manifest.registries()?;
    let data_path = manifest.data_path();
    let table = read_data_table(&data_path, manifest.table_format())?;
    let assignments = assign_columns(&table.headers, &manifest.columns, &registries)?;
    info!(
        data = %data_path.display(),
        rows = table.rows.len(),
        columns = assignments.len(),
        "loaded submission"
    );
    Ok(Submission {
        manifest,
        registries,
        table,
        assignments,
    })
}

impl Submission {
    /// Standardizes the data rows with the manifest's options.
    pub fn standardize(&self) -> Result<StdUserDataArray> {
        Ok(StdUserDataArray::standardize(
            &self.table.rows,
            &self.assignments,
            &self.registries,
            &self.manifest.options(),
        )?)
    }

    /// Dataset metadata from the metadata columns of the data, the
    /// manifest, and the sample positions and times.
    ///
    /// Manifest values override column values. Rows missing a position or
    /// time do not count toward the bounds.
    pub fn metadata(&self, user: &StdUserDataArray) -> Result<MetadataRecord> {
        let mut record = MetadataRecord::new(&self.registries.metadata);
        record.apply_user_columns(user)?;
        self.manifest.apply_dataset(&mut record)?;

        let num_samples = user.num_samples();
        let longitudes = user
            .array()
            .sample_longitudes()
            .unwrap_or_else(|| vec![None; num_samples]);
        let latitudes = user
            .array()
            .sample_latitudes()
            .unwrap_or_else(|| vec![None; num_samples]);
        let times = user.sample_times();
        let excluded: BTreeSet<usize> = (0..num_samples)
            .filter(|&row| longitudes[row].is_none() || latitudes[row].is_none() || times[row].is_none())
            .collect();
        if excluded.len() == num_samples {
            warn!("no sample has a position and time; dataset bounds are left missing");
        } else {
            record.derive_bounds_from_samples(&longitudes, &latitudes, times, &excluded)?;
        }
        Ok(record)
    }
}
