//! Location files for `dsg update-flags`.
//!
//! A tab-separated file with a header row naming at least `longitude`,
//! `latitude` and `time` (seconds since 1970-01-01). Optional `row`,
//! `depth` and `value` columns are used when present. Lines starting with
//! `#` are skipped.

use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use dsg_model::DataLocation;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct LocationRecord {
    #[serde(default)]
    row: Option<usize>,
    #[serde(alias = "lon")]
    longitude: f64,
    #[serde(alias = "lat")]
    latitude: f64,
    time: f64,
    #[serde(default)]
    depth: Option<f64>,
    #[serde(default)]
    value: Option<f64>,
}

impl From<LocationRecord> for DataLocation {
    fn from(record: LocationRecord) -> Self {
        let mut location = DataLocation::new(record.longitude, record.latitude, record.time);
        if let Some(row) = record.row {
            location = location.with_row(row);
        }
        if let Some(depth) = record.depth {
            location = location.with_depth(depth);
        }
        if let Some(value) = record.value {
            location = location.with_data_value(value);
        }
        location
    }
}

pub fn read_locations(path: &Path) -> Result<Vec<DataLocation>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("open location file {}", path.display()))?;
    let mut locations = Vec::new();
    for (index, record) in reader.deserialize::<LocationRecord>().enumerate() {
        let record = record.with_context(|| {
            format!("location {} in {}", index + 1, path.display())
        })?;
        locations.push(DataLocation::from(record));
    }
    debug!(path = %path.display(), locations = locations.len(), "read locations");
    Ok(locations)
}
