//! Location-keyed updates of per-sample QC flags.

use std::collections::HashSet;

use dsg_model::{DataLocation, close_to, longitude_close_to};
use dsg_nc::Values;
use dsg_standards::names;
use tracing::{debug, info};

use crate::error::{AtPath, DsgFileError, Result};
use crate::file::DsgFile;

const LONGITUDE_TOLERANCE: f64 = 0.001;
const LATITUDE_TOLERANCE: f64 = 0.0001;
const TIME_TOLERANCE: f64 = 1.0;
const DATA_VALUE_TOLERANCE: f64 = 1.0E-6;

/// A flag value to set on the samples at the given locations.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagUpdate {
    /// Variable holding the flags, e.g. `WOCE_CO2_water`.
    pub flag_name: String,
    pub flag: char,
    /// Data variable whose value must also match each location's
    /// `data_value`; positions alone are compared when `None`.
    pub data_name: Option<String>,
    pub locations: Vec<DataLocation>,
}

impl FlagUpdate {
    pub fn new(flag_name: impl Into<String>, flag: char, locations: Vec<DataLocation>) -> Self {
        Self {
            flag_name: flag_name.into(),
            flag,
            data_name: None,
            locations,
        }
    }

    #[must_use]
    pub fn with_data_name(mut self, name: impl Into<String>) -> Self {
        self.data_name = Some(name.into());
        self
    }
}

struct Samples {
    longitudes: Vec<f64>,
    latitudes: Vec<f64>,
    times: Vec<f64>,
    data_values: Option<Vec<f64>>,
}

impl Samples {
    fn matches(&self, location: &DataLocation, index: usize) -> bool {
        if !longitude_close_to(location.longitude, self.longitudes[index], 0.0, LONGITUDE_TOLERANCE)
            || !close_to(location.latitude, self.latitudes[index], 0.0, LATITUDE_TOLERANCE)
            || !close_to(location.time, self.times[index], 0.0, TIME_TOLERANCE)
        {
            return false;
        }
        match (&self.data_values, location.data_value) {
            (None, _) => true,
            (Some(values), Some(value)) => {
                close_to(value, values[index], DATA_VALUE_TOLERANCE, DATA_VALUE_TOLERANCE)
            }
            (Some(_), None) => false,
        }
    }
}

impl DsgFile {
    /// Sets the flag of every sample matching a location of `update`.
    ///
    /// Locations are matched in order with a round-robin search starting
    /// after the previous match, and each sample is claimed by at most one
    /// location. With `fill_row_numbers`, matched locations get the 1-based
    /// row number of their sample. Returns the locations that matched no
    /// sample.
    pub fn update_flags_by_location(
        &self,
        update: &mut FlagUpdate,
        fill_row_numbers: bool,
    ) -> Result<Vec<DataLocation>> {
        let mut patcher = self.patcher()?;
        let mut read_doubles = |name: &str| -> Result<Vec<f64>> {
            match patcher.read(name).at(self.path())? {
                Values::Doubles(values) => Ok(values),
                other => Err(DsgFileError::file_format(
                    self.path(),
                    format!("variable {name} holds {} values, not double", other.nc_type()),
                )),
            }
        };
        let samples = Samples {
            longitudes: read_doubles(names::LONGITUDE)?,
            latitudes: read_doubles(names::LATITUDE)?,
            times: read_doubles(names::TIME)?,
            data_values: update.data_name.as_deref().map(&mut read_doubles).transpose()?,
        };
        let size = samples.times.len();
        let columns = [
            (names::LONGITUDE, samples.longitudes.len()),
            (names::LATITUDE, samples.latitudes.len()),
        ]
        .into_iter()
        .chain(
            update
                .data_name
                .as_deref()
                .zip(samples.data_values.as_ref().map(Vec::len)),
        );
        for (name, len) in columns {
            if len != size {
                return Err(DsgFileError::ShapeMismatch {
                    path: self.path().to_path_buf(),
                    name: name.to_string(),
                    expected: size,
                    actual: len,
                });
            }
        }

        let shape = patcher.shape(&update.flag_name).at(self.path())?;
        let width = match shape.as_slice() {
            [rows] if *rows == size => 1,
            [rows, width] if *rows == size => *width,
            _ => {
                return Err(DsgFileError::ShapeMismatch {
                    path: self.path().to_path_buf(),
                    name: update.flag_name.clone(),
                    expected: size,
                    actual: shape.first().copied().unwrap_or(0),
                });
            }
        };
        let Values::Chars(mut flags) = patcher.read(&update.flag_name).at(self.path())? else {
            return Err(DsgFileError::file_format(
                self.path(),
                format!("variable {} is not a flag variable", update.flag_name),
            ));
        };
        let flag = u8::try_from(update.flag).map_err(|_| {
            DsgFileError::file_format(self.path(), format!("flag '{}' is not a single byte", update.flag))
        })?;

        let mut claimed = HashSet::new();
        let mut start = 0;
        let mut unmatched = Vec::new();
        for location in &mut update.locations {
            let found = (start..size)
                .chain(0..start)
                .find(|&index| samples.matches(location, index) && claimed.insert(index));
            match found {
                Some(index) => {
                    let cell = &mut flags[index * width..(index + 1) * width];
                    cell.fill(0);
                    cell[0] = flag;
                    if fill_row_numbers {
                        location.row_number = Some(index + 1);
                    }
                    start = index + 1;
                }
                None => {
                    debug!(
                        longitude = location.longitude,
                        latitude = location.latitude,
                        time = location.time,
                        "no sample at location"
                    );
                    unmatched.push(*location);
                }
            }
        }

        patcher
            .write(&update.flag_name, &Values::Chars(flags))
            .at(self.path())?;
        info!(
            path = %self.path().display(),
            flag = %update.flag,
            variable = %update.flag_name,
            matched = update.locations.len() - unmatched.len(),
            unmatched = unmatched.len(),
            "updated data QC flags"
        );
        Ok(unmatched)
    }
}
