//! Dataset-level metadata.

use std::collections::BTreeSet;

use dsg_model::{
    DataKind, DataType, DataValue, MAX_ABSOLUTE_ERROR, ModelError, close_to, longitude_close_to,
};
use dsg_standards::{TypeRegistry, names};

use crate::array::string_dimension_length;
use crate::user::StdUserDataArray;

type ModelResult<T> = dsg_model::Result<T>;

/// One value per metadata type, in registry order.
///
/// Every type of the registry is present; an unset value holds the type's
/// missing value.
#[derive(Debug, Clone)]
pub struct MetadataRecord {
    entries: Vec<(DataType, DataValue)>,
}

impl MetadataRecord {
    pub fn new(registry: &TypeRegistry) -> Self {
        Self {
            entries: registry
                .iter()
                .map(|data_type| (data_type.clone(), data_type.missing_value()))
                .collect(),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&DataType, &DataValue)> {
        self.entries.iter().map(|(data_type, value)| (data_type, value))
    }

    pub fn data_types(&self) -> impl Iterator<Item = &DataType> {
        self.entries.iter().map(|(data_type, _)| data_type)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(data_type, _)| data_type.var_name() == name)
    }

    /// The stored value, which may be the type's missing value.
    pub fn raw_value(&self, name: &str) -> Option<&DataValue> {
        self.position(name).map(|index| &self.entries[index].1)
    }

    /// The value, or `None` when unset or missing.
    pub fn value(&self, name: &str) -> Option<&DataValue> {
        let (data_type, value) = &self.entries[self.position(name)?];
        (!data_type.is_missing_value(value)).then_some(value)
    }

    /// Sets a value; `None` stores the type's missing value.
    pub fn set_value(&mut self, name: &str, value: Option<DataValue>) -> ModelResult<()> {
        let index = self.position(name).ok_or_else(|| {
            ModelError::configuration(format!("{name} is not a metadata type"))
        })?;
        let (data_type, slot) = &mut self.entries[index];
        *slot = match value {
            Some(value) => {
                data_type.check_kind(&value)?;
                value
            }
            None => data_type.missing_value(),
        };
        Ok(())
    }

    pub fn string_value(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(DataValue::as_str)
    }

    pub fn double_value(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(DataValue::as_double)
    }

    fn set_string(&mut self, name: &str, value: Option<&str>) -> ModelResult<()> {
        self.set_value(name, value.map(DataValue::from))
    }

    fn set_double(&mut self, name: &str, value: Option<f64>) -> ModelResult<()> {
        self.set_value(name, value.map(DataValue::Double))
    }

    pub fn dataset_id(&self) -> Option<&str> {
        self.string_value(names::EXPOCODE)
    }

    /// Dataset ids are stored in upper case.
    pub fn set_dataset_id(&mut self, value: Option<&str>) -> ModelResult<()> {
        let upper = value.map(|id| id.trim().to_uppercase());
        self.set_string(names::EXPOCODE, upper.as_deref())
    }

    pub fn dataset_name(&self) -> Option<&str> {
        self.string_value(names::DATASET_NAME)
    }

    pub fn set_dataset_name(&mut self, value: Option<&str>) -> ModelResult<()> {
        self.set_string(names::DATASET_NAME, value)
    }

    pub fn platform_name(&self) -> Option<&str> {
        self.string_value(names::PLATFORM_NAME)
    }

    pub fn set_platform_name(&mut self, value: Option<&str>) -> ModelResult<()> {
        self.set_string(names::PLATFORM_NAME, value)
    }

    pub fn platform_type(&self) -> Option<&str> {
        self.string_value(names::PLATFORM_TYPE)
    }

    pub fn set_platform_type(&mut self, value: Option<&str>) -> ModelResult<()> {
        self.set_string(names::PLATFORM_TYPE, value)
    }

    pub fn organization(&self) -> Option<&str> {
        self.string_value(names::ORGANIZATION)
    }

    pub fn set_organization(&mut self, value: Option<&str>) -> ModelResult<()> {
        self.set_string(names::ORGANIZATION, value)
    }

    pub fn investigators(&self) -> Option<&str> {
        self.string_value(names::INVESTIGATORS)
    }

    pub fn set_investigators(&mut self, value: Option<&str>) -> ModelResult<()> {
        self.set_string(names::INVESTIGATORS, value)
    }

    pub fn westmost_longitude(&self) -> Option<f64> {
        self.double_value(names::WESTERNMOST_LONGITUDE)
    }

    pub fn set_westmost_longitude(&mut self, value: Option<f64>) -> ModelResult<()> {
        self.set_double(names::WESTERNMOST_LONGITUDE, value)
    }

    pub fn eastmost_longitude(&self) -> Option<f64> {
        self.double_value(names::EASTERNMOST_LONGITUDE)
    }

    pub fn set_eastmost_longitude(&mut self, value: Option<f64>) -> ModelResult<()> {
        self.set_double(names::EASTERNMOST_LONGITUDE, value)
    }

    pub fn southmost_latitude(&self) -> Option<f64> {
        self.double_value(names::SOUTHERNMOST_LATITUDE)
    }

    pub fn set_southmost_latitude(&mut self, value: Option<f64>) -> ModelResult<()> {
        self.set_double(names::SOUTHERNMOST_LATITUDE, value)
    }

    pub fn northmost_latitude(&self) -> Option<f64> {
        self.double_value(names::NORTHERNMOST_LATITUDE)
    }

    pub fn set_northmost_latitude(&mut self, value: Option<f64>) -> ModelResult<()> {
        self.set_double(names::NORTHERNMOST_LATITUDE, value)
    }

    pub fn begin_time(&self) -> Option<f64> {
        self.double_value(names::TIME_COVERAGE_START)
    }

    pub fn set_begin_time(&mut self, value: Option<f64>) -> ModelResult<()> {
        self.set_double(names::TIME_COVERAGE_START, value)
    }

    pub fn end_time(&self) -> Option<f64> {
        self.double_value(names::TIME_COVERAGE_END)
    }

    pub fn set_end_time(&mut self, value: Option<f64>) -> ModelResult<()> {
        self.set_double(names::TIME_COVERAGE_END, value)
    }

    pub fn qc_flag(&self) -> Option<&str> {
        self.string_value(names::QC_FLAG)
    }

    pub fn set_qc_flag(&mut self, value: Option<&str>) -> ModelResult<()> {
        self.set_string(names::QC_FLAG, value)
    }

    pub fn version(&self) -> Option<&str> {
        self.string_value(names::SOCAT_VERSION)
    }

    pub fn set_version(&mut self, value: Option<&str>) -> ModelResult<()> {
        self.set_string(names::SOCAT_VERSION, value)
    }

    pub fn all_region_ids(&self) -> Option<&str> {
        self.string_value(names::ALL_REGION_IDS)
    }

    pub fn set_all_region_ids(&mut self, value: Option<&str>) -> ModelResult<()> {
        self.set_string(names::ALL_REGION_IDS, value)
    }

    pub fn doi(&self) -> Option<&str> {
        self.string_value(names::SOCAT_DOI)
    }

    pub fn set_doi(&mut self, value: Option<&str>) -> ModelResult<()> {
        self.set_string(names::SOCAT_DOI, value)
    }

    /// Sets the bounding box and time range from sample positions.
    ///
    /// Rows in `excluded` (0-based) are skipped. Longitudes are unwrapped
    /// across the antimeridian before taking the extremes, so a cruise
    /// crossing 180 gets a narrow box with west > east.
    pub fn derive_bounds_from_samples(
        &mut self,
        longitudes: &[Option<f64>],
        latitudes: &[Option<f64>],
        times: &[Option<f64>],
        excluded: &BTreeSet<usize>,
    ) -> ModelResult<()> {
        if longitudes.len() != latitudes.len() || longitudes.len() != times.len() {
            return Err(ModelError::value(format!(
                "{} longitudes, {} latitudes and {} times given",
                longitudes.len(),
                latitudes.len(),
                times.len()
            )));
        }
        let valid = |value: Option<f64>, what: &str, row: usize| {
            value.filter(|v| v.is_finite()).ok_or_else(|| {
                ModelError::value(format!("invalid {what} in row {}", row + 1))
            })
        };

        let mut lat_range: Option<(f64, f64)> = None;
        let mut time_range: Option<(f64, f64)> = None;
        let mut lon_range: Option<(f64, f64)> = None;
        let mut previous: Option<f64> = None;
        for row in 0..longitudes.len() {
            if excluded.contains(&row) {
                continue;
            }
            let lon = valid(longitudes[row], "longitude", row)?;
            let lat = valid(latitudes[row], "latitude", row)?;
            let time = valid(times[row], "time", row)?;
            lat_range = Some(extend(lat_range, lat));
            time_range = Some(extend(time_range, time));

            let mut unwrapped = lon;
            if let Some(previous) = previous {
                let jump = unwrapped - previous;
                if jump.abs() > 180.0 {
                    unwrapped -= 360.0 * (jump / 360.0).round();
                }
            }
            previous = Some(unwrapped);
            lon_range = Some(extend(lon_range, unwrapped));
        }

        let (Some((west, east)), Some((south, north)), Some((begin, end))) =
            (lon_range, lat_range, time_range)
        else {
            return Err(ModelError::value("no samples to derive bounds from"));
        };
        let (west, east) = if east - west >= 360.0 {
            (-180.0, 180.0)
        } else {
            (fold(west), fold(east))
        };
        self.set_westmost_longitude(Some(west))?;
        self.set_eastmost_longitude(Some(east))?;
        self.set_southmost_latitude(Some(south))?;
        self.set_northmost_latitude(Some(north))?;
        self.set_begin_time(Some(begin))?;
        self.set_end_time(Some(end))
    }

    /// Copies metadata-type columns of a submission, taking the first
    /// non-missing value of each.
    pub fn apply_user_columns(&mut self, user: &StdUserDataArray) -> ModelResult<()> {
        let array = user.array();
        for col in 0..array.num_columns() {
            let Some(data_type) = array.data_type(col) else {
                continue;
            };
            let Some(index) = self
                .entries
                .iter()
                .position(|(meta, _)| meta.type_name_equals(data_type))
            else {
                continue;
            };
            if let Some(value) = array.column_values(col).flatten().next() {
                let name = self.entries[index].0.var_name().to_string();
                if name == names::EXPOCODE {
                    self.set_dataset_id(value.as_str())?;
                } else {
                    self.set_value(&name, Some(value.clone()))?;
                }
            }
        }
        Ok(())
    }

    /// Longest string value, rounded up to a multiple of 32 (at least 32).
    pub fn max_string_length(&self) -> usize {
        let longest = self
            .entries
            .iter()
            .filter_map(|(_, value)| value.as_str())
            .map(str::len)
            .max()
            .unwrap_or(0);
        string_dimension_length(longest)
    }
}

impl PartialEq for MetadataRecord {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|((type_a, a), (type_b, b))| type_a == type_b && values_close(type_a, a, b))
    }
}

fn values_close(data_type: &DataType, a: &DataValue, b: &DataValue) -> bool {
    match (data_type.kind(), a, b) {
        (DataKind::Double, DataValue::Double(a), DataValue::Double(b)) => {
            if data_type.var_name().to_uppercase().contains("LON") {
                longitude_close_to(*a, *b, 0.0, MAX_ABSOLUTE_ERROR)
            } else {
                close_to(*a, *b, 0.0, MAX_ABSOLUTE_ERROR)
            }
        }
        _ => a == b,
    }
}

fn extend(range: Option<(f64, f64)>, value: f64) -> (f64, f64) {
    match range {
        Some((min, max)) => (min.min(value), max.max(value)),
        None => (value, value),
    }
}

/// Folds any finite longitude into (-180, 180].
fn fold(longitude: f64) -> f64 {
    let folded = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    if folded == -180.0 { 180.0 } else { folded }
}
