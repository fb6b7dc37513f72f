//! Reads and in-place updates of single variables.
//!
//! Updates never change a dimension: values must fill the existing
//! variable exactly and strings must fit its string dimension.

use std::collections::BTreeSet;

use dsg_model::FP_MISSING_VALUE;
use dsg_nc::{NcPatcher, Values};
use dsg_standards::names;
use tracing::info;

use crate::error::{AtPath, DsgFileError, Result};
use crate::file::DsgFile;

impl DsgFile {
    /// Trimmed values of a string variable.
    pub fn read_string_values(&self, name: &str) -> Result<Vec<String>> {
        self.open()?.read_text_rows(name).at(self.path())
    }

    /// Replaces every value of a string variable.
    pub fn write_string_values<S: AsRef<str>>(&self, name: &str, values: &[S]) -> Result<()> {
        let mut patcher = self.patcher()?;
        patcher.write_text_rows(name, values).at(self.path())
    }

    /// Raw values of an integer variable; missing values stay sentinels.
    pub fn read_int_values(&self, name: &str) -> Result<Vec<i32>> {
        self.open()?.read_ints(name).at(self.path())
    }

    pub fn write_int_values(&self, name: &str, values: &[i32]) -> Result<()> {
        let mut patcher = self.patcher()?;
        patcher.write(name, &Values::Ints(values.to_vec())).at(self.path())
    }

    /// Values of a double variable. NaN and infinities read as the missing
    /// value sentinel.
    pub fn read_double_values(&self, name: &str) -> Result<Vec<f64>> {
        let values = self.open()?.read_doubles(name).at(self.path())?;
        Ok(values.into_iter().map(sentinel_if_not_finite).collect())
    }

    pub fn write_double_values(&self, name: &str, values: &[f64]) -> Result<()> {
        let values = values.iter().copied().map(sentinel_if_not_finite).collect();
        let mut patcher = self.patcher()?;
        patcher.write(name, &Values::Doubles(values)).at(self.path())
    }

    /// Longitudes, latitudes and times of all samples.
    pub fn read_lon_lat_time(&self) -> Result<[Vec<f64>; 3]> {
        self.read_parallel([names::LONGITUDE, names::LATITUDE, names::TIME])
    }

    /// Longitudes, latitudes, times, sea surface temperatures and
    /// recommended fCO2 values of all samples.
    pub fn read_lon_lat_time_sst_fco2(&self) -> Result<[Vec<f64>; 5]> {
        self.read_parallel([
            names::LONGITUDE,
            names::LATITUDE,
            names::TIME,
            names::SST,
            names::FCO2_REC,
        ])
    }

    /// Double variables that must all have as many values as the first.
    fn read_parallel<const N: usize>(&self, variable_names: [&str; N]) -> Result<[Vec<f64>; N]> {
        let file = self.open()?;
        let mut columns: [Vec<f64>; N] = std::array::from_fn(|_| Vec::new());
        for (column, name) in columns.iter_mut().zip(variable_names) {
            *column = file
                .read_doubles(name)
                .at(self.path())?
                .into_iter()
                .map(sentinel_if_not_finite)
                .collect();
        }
        let expected = columns.first().map_or(0, Vec::len);
        for (column, name) in columns.iter().zip(variable_names) {
            if column.len() != expected {
                return Err(DsgFileError::ShapeMismatch {
                    path: self.path().to_path_buf(),
                    name: name.to_string(),
                    expected,
                    actual: column.len(),
                });
            }
        }
        Ok(columns)
    }

    /// The dataset QC flag and version.
    pub fn dataset_qc_flag_and_version(&self) -> Result<(String, String)> {
        let file = self.open()?;
        let first = |name: &str| -> Result<String> {
            let rows = file.read_text_rows(name).at(self.path())?;
            Ok(rows.into_iter().next().unwrap_or_default())
        };
        Ok((first(names::QC_FLAG)?, first(names::SOCAT_VERSION)?))
    }

    pub fn update_dataset_qc_flag_and_version(&self, qc_flag: &str, version: &str) -> Result<()> {
        let mut patcher = self.patcher()?;
        // Both are checked before either is written.
        for name in [names::QC_FLAG, names::SOCAT_VERSION] {
            if patcher.header().variable(name).is_none() {
                return Err(DsgFileError::variable_not_found(self.path(), name));
            }
        }
        patcher
            .write_text_rows(names::QC_FLAG, &[qc_flag.trim()])
            .at(self.path())?;
        patcher
            .write_text_rows(names::SOCAT_VERSION, &[version.trim()])
            .at(self.path())?;
        info!(path = %self.path().display(), qc_flag, version, "updated dataset QC flag");
        Ok(())
    }

    /// Writes the all-region-ids metadata value and returns it.
    ///
    /// Without `new_value`, the value is the sorted unique region ids of the
    /// samples concatenated.
    pub fn update_all_region_ids(&self, new_value: Option<&str>) -> Result<String> {
        let value = match new_value {
            Some(value) => value.trim().to_string(),
            None => self.region_ids()?.into_iter().collect(),
        };
        let mut patcher = self.patcher()?;
        patcher
            .write_text_rows(names::ALL_REGION_IDS, &[value.as_str()])
            .at(self.path())?;
        Ok(value)
    }

    fn region_ids(&self) -> Result<BTreeSet<String>> {
        let file = self.open()?;
        let shape = file.shape(names::REGION_ID).at(self.path())?;
        let ids: Vec<String> = if shape.len() == 2 {
            file.read_text_rows(names::REGION_ID).at(self.path())?
        } else {
            file.read_chars(names::REGION_ID)
                .at(self.path())?
                .into_iter()
                .map(|byte| char::from(byte).to_string())
                .collect()
        };
        Ok(ids
            .iter()
            .map(|id| id.trim_matches(|c: char| c.is_whitespace() || c == '\0'))
            .filter(|id| !id.is_empty())
            .map(ToString::to_string)
            .collect())
    }

    pub(crate) fn patcher(&self) -> Result<NcPatcher> {
        NcPatcher::open(self.path()).at(self.path())
    }
}

fn sentinel_if_not_finite(value: f64) -> f64 {
    if value.is_finite() { value } else { FP_MISSING_VALUE }
}
