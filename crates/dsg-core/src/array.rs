//! The typed sample grid shared by the standardization and file layers.

use dsg_model::{DataKind, DataType, DataValue, woce};
use dsg_standards::names;

use crate::error::{Result, StandardizeError};

/// Rounds a string length up to a multiple of 32, with a minimum of 32.
pub fn string_dimension_length(max_len: usize) -> usize {
    max_len.max(1).div_ceil(32) * 32
}

/// An N×M grid of standardized values with one [`DataType`] per column.
///
/// Missing values are `None`; a non-missing value always has the host
/// kind of its column's type.
#[derive(Debug, Clone, PartialEq)]
pub struct StdDataArray {
    types: Vec<DataType>,
    values: Vec<Vec<Option<DataValue>>>,
    usable: Vec<bool>,
}

impl StdDataArray {
    /// An array of `num_samples` rows with every value missing.
    pub fn filled(types: Vec<DataType>, num_samples: usize) -> Self {
        let width = types.len();
        Self {
            usable: vec![true; width],
            values: vec![vec![None; width]; num_samples],
            types,
        }
    }

    /// Builds an array from column-major values, checking kinds and lengths.
    pub fn from_columns(types: Vec<DataType>, columns: Vec<Vec<Option<DataValue>>>) -> Result<Self> {
        if types.len() != columns.len() {
            return Err(StandardizeError::configuration(format!(
                "{} data types given for {} columns",
                types.len(),
                columns.len()
            )));
        }
        let num_samples = columns.first().map_or(0, Vec::len);
        let mut array = Self::filled(types, num_samples);
        for (col, column) in columns.into_iter().enumerate() {
            if column.len() != num_samples {
                return Err(StandardizeError::configuration(format!(
                    "column {} has {} values; expected {num_samples}",
                    array.types[col].var_name(),
                    column.len()
                )));
            }
            for (row, value) in column.into_iter().enumerate() {
                array.set_value(row, col, value)?;
            }
        }
        Ok(array)
    }

    pub(crate) fn mark_unusable(&mut self, col: usize) {
        self.usable[col] = false;
        for row in &mut self.values {
            row[col] = None;
        }
    }

    pub fn num_samples(&self) -> usize {
        self.values.len()
    }

    pub fn num_columns(&self) -> usize {
        self.types.len()
    }

    pub fn data_types(&self) -> &[DataType] {
        &self.types
    }

    pub fn data_type(&self, col: usize) -> Option<&DataType> {
        self.types.get(col)
    }

    /// False for columns whose values could not be standardized at all.
    pub fn is_usable(&self, col: usize) -> bool {
        self.usable.get(col).copied().unwrap_or(false)
    }

    pub fn value(&self, row: usize, col: usize) -> Option<&DataValue> {
        self.values.get(row)?.get(col)?.as_ref()
    }

    pub fn row(&self, row: usize) -> Option<&[Option<DataValue>]> {
        self.values.get(row).map(Vec::as_slice)
    }

    /// Sets one value after checking it against the column's type.
    pub fn set_value(&mut self, row: usize, col: usize, value: Option<DataValue>) -> Result<()> {
        let data_type = self.types.get(col).ok_or_else(|| {
            StandardizeError::configuration(format!("no column {col}"))
        })?;
        if let Some(value) = &value {
            data_type
                .check_kind(value)
                .map_err(|err| StandardizeError::configuration(err.to_string()))?;
        }
        let num_samples = self.values.len();
        let slot = self
            .values
            .get_mut(row)
            .and_then(|cells| cells.get_mut(col))
            .ok_or_else(|| {
                StandardizeError::configuration(format!(
                    "row {row} is outside the {num_samples} samples"
                ))
            })?;
        *slot = value;
        Ok(())
    }

    /// Index of the first column whose type is known by `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.types
            .iter()
            .position(|t| t.var_name() == name)
            .or_else(|| self.types.iter().position(|t| t.name_matches(name)))
    }

    pub fn column_values(&self, col: usize) -> impl Iterator<Item = Option<&DataValue>> {
        self.values.iter().map(move |row| row.get(col).and_then(Option::as_ref))
    }

    /// The values of a Double column, or `None` if there is no such column.
    pub fn double_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let col = self.column_index(name)?;
        if self.types[col].kind() != DataKind::Double {
            return None;
        }
        Some(
            self.column_values(col)
                .map(|value| value.and_then(DataValue::as_double))
                .collect(),
        )
    }

    pub fn sample_longitudes(&self) -> Option<Vec<Option<f64>>> {
        self.double_column(names::LONGITUDE)
    }

    pub fn sample_latitudes(&self) -> Option<Vec<Option<f64>>> {
        self.double_column(names::LATITUDE)
    }

    pub fn sample_depths(&self) -> Option<Vec<Option<f64>>> {
        self.double_column(names::SAMPLE_DEPTH)
    }

    /// Sample times in seconds since 1970-01-01 from the `time` column.
    pub fn sample_times(&self) -> Option<Vec<Option<f64>>> {
        self.double_column(names::TIME)
    }

    pub fn autocheck_flags(&self) -> Option<Vec<Option<char>>> {
        let col = self.column_index(names::WOCE_AUTOCHECK)?;
        Some(
            self.column_values(col)
                .map(|value| value.and_then(DataValue::as_char))
                .collect(),
        )
    }

    /// Overwrites the automatic QC flag of one row.
    pub fn set_autocheck_flag(&mut self, row: usize, flag: char) -> Result<()> {
        let col = self.column_index(names::WOCE_AUTOCHECK).ok_or_else(|| {
            StandardizeError::configuration("no WOCE_AUTOCHECK column")
        })?;
        self.set_value(row, col, Some(DataValue::Char(flag)))
    }

    /// Resets every automatic QC flag to acceptable.
    pub fn reset_autocheck_flags(&mut self) -> Result<()> {
        for row in 0..self.num_samples() {
            self.set_autocheck_flag(row, woce::ACCEPTABLE)?;
        }
        Ok(())
    }

    /// Longest string value in bytes.
    pub fn max_string_length(&self) -> usize {
        self.values
            .iter()
            .flatten()
            .filter_map(|value| value.as_ref().and_then(DataValue::as_str))
            .map(str::len)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsg_model::{Role, units};
    use proptest::prelude::*;

    fn double_type(name: &str, sort: f64) -> DataType {
        DataType::builder(name, DataKind::Double, sort)
            .units(units::NO_UNITS)
            .roles(&[Role::FileData])
            .build()
            .unwrap()
    }

    #[test]
    fn string_lengths_round_up() {
        assert_eq!(string_dimension_length(0), 32);
        assert_eq!(string_dimension_length(32), 32);
        assert_eq!(string_dimension_length(33), 64);
    }

    proptest! {
        #[test]
        fn string_lengths_fit_in_the_smallest_multiple(len in 0usize..10_000) {
            let dim = string_dimension_length(len);
            prop_assert_eq!(dim % 32, 0);
            prop_assert!(dim >= len.max(1));
            prop_assert!(dim < len.max(1) + 32);
        }
    }

    #[test]
    fn columns_are_checked() {
        let types = vec![double_type("longitude", 1.0), double_type("latitude", 2.0)];
        let array = StdDataArray::from_columns(
            types.clone(),
            vec![
                vec![Some(DataValue::Double(10.0)), None],
                vec![Some(DataValue::Double(45.0)), Some(DataValue::Double(46.0))],
            ],
        )
        .unwrap();
        assert_eq!(array.num_samples(), 2);
        assert_eq!(array.sample_longitudes(), Some(vec![Some(10.0), None]));
        assert_eq!(array.sample_depths(), None);

        let err = StdDataArray::from_columns(types, vec![vec![Some(DataValue::Int(1))], vec![None]]);
        assert!(err.is_err());
    }

    #[test]
    fn unusable_columns_are_cleared() {
        let mut array = StdDataArray::filled(vec![double_type("sal", 1.0)], 2);
        array.set_value(0, 0, Some(DataValue::Double(35.0))).unwrap();
        array.mark_unusable(0);
        assert!(!array.is_usable(0));
        assert_eq!(array.value(0, 0), None);
        assert!(array.set_value(2, 0, None).is_err());
    }
}
