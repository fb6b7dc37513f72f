//! Standardization of raw submission rows.

use std::time::Instant;

use chrono::{DateTime, Datelike, Timelike};
use dsg_model::{DataType, DataValue, Diagnostic, Severity, woce};
use dsg_standards::{Registries, TypeRegistry, names};
use dsg_transform::{ConvertError, Converter};
use tracing::{debug, info, info_span, trace, warn};

use crate::array::StdDataArray;
use crate::assignment::ColumnAssignment;
use crate::error::{Result, StandardizeError};
use crate::options::StandardizeOptions;
use crate::resolver::resolution_order;
use crate::sample_time::TimeSpec;

/// A standardized submission together with the diagnostics found while
/// standardizing it.
///
/// Columns are the user columns in submission order, followed by
/// `sample_number` and `WOCE_AUTOCHECK` when the submission did not
/// provide them.
#[derive(Debug, Clone, PartialEq)]
pub struct StdUserDataArray {
    array: StdDataArray,
    headers: Vec<String>,
    units: Vec<String>,
    user_columns: usize,
    row_numbers: Vec<usize>,
    diagnostics: Vec<Diagnostic>,
    time_spec: Option<TimeSpec>,
    sample_times: Vec<Option<f64>>,
}

impl StdUserDataArray {
    /// Converts every raw cell with the converter of its column.
    ///
    /// Problems with individual cells become diagnostics. Only problems
    /// with the assignments themselves (unknown units, missing or cyclic
    /// column dependencies) are errors.
    pub fn standardize(
        rows: &[Vec<String>],
        assignments: &[ColumnAssignment],
        registries: &Registries,
        options: &StandardizeOptions,
    ) -> Result<Self> {
        let span = info_span!("standardize", rows = rows.len(), columns = assignments.len());
        let _guard = span.enter();
        let start = Instant::now();

        if rows.is_empty() {
            return Err(StandardizeError::NoData);
        }
        if assignments.is_empty() {
            return Err(StandardizeError::configuration("no columns given"));
        }
        let num_samples = rows.len();
        let row_numbers = match &options.row_numbers {
            Some(numbers) if numbers.len() != num_samples => {
                return Err(StandardizeError::configuration(format!(
                    "{} row numbers given for {num_samples} rows",
                    numbers.len()
                )));
            }
            Some(numbers) => numbers.clone(),
            None => (1..=num_samples).collect(),
        };

        let user_columns = assignments.len();
        let mut types: Vec<DataType> = Vec::with_capacity(user_columns + 2);
        let mut headers = Vec::with_capacity(user_columns + 2);
        let mut units = Vec::with_capacity(user_columns + 2);
        for assignment in assignments {
            types.push(assignment.data_type.clone());
            headers.push(assignment.header.clone());
            units.push(assignment.unit.clone());
        }
        let mut synthesized = Vec::new();
        for name in [names::SAMPLE_NUMBER, names::WOCE_AUTOCHECK] {
            if types.iter().any(|t| t.name_matches(name)) {
                continue;
            }
            let data_type = registries.data.get(name).ok_or_else(|| {
                StandardizeError::configuration(format!("the data types do not define {name}"))
            })?;
            synthesized.push(types.len());
            types.push(data_type.clone());
            headers.push(name.to_string());
            units.push(data_type.canonical_unit().to_string());
        }

        let mut array = StdDataArray::filled(types, num_samples);
        let mut diagnostics = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            if row.len() != user_columns {
                diagnostics.push(
                    Diagnostic::new(
                        Severity::Critical,
                        format!(
                            "inconstistent number of data values; {user_columns} expected but {} found",
                            row.len()
                        ),
                    )
                    .at_row(row_numbers[index]),
                );
            }
        }

        let mut converters: Vec<Option<Converter>> = Vec::with_capacity(user_columns);
        for (col, assignment) in assignments.iter().enumerate() {
            if assignment.is_ignored() {
                array.mark_unusable(col);
                converters.push(None);
                continue;
            }
            let converter = Converter::new(
                &assignment.data_type,
                &assignment.unit,
                assignment.missing.as_deref(),
            )
            .map_err(|err| {
                StandardizeError::configuration(format!("column '{}': {err}", assignment.header))
            })?;
            debug!(
                column = %assignment.header,
                data_type = assignment.data_type.var_name(),
                converter = converter.name(),
                "column converter"
            );
            converters.push(Some(converter));
        }

        let mut requires: Vec<Vec<usize>> = Vec::with_capacity(user_columns);
        for (col, converter) in converters.iter().enumerate() {
            let mut needs = Vec::new();
            for &required in converter.as_ref().map_or(&[][..], Converter::requires) {
                let found = (0..user_columns)
                    .find(|&other| converters[other].is_some() && array.data_types()[other].name_matches(required));
                match found {
                    Some(other) => needs.push(other),
                    None => {
                        return Err(StandardizeError::UnresolvableColumn {
                            column: headers[col].clone(),
                            required: required.to_string(),
                        });
                    }
                }
            }
            requires.push(needs);
        }
        let order = resolution_order(&requires, &headers[..user_columns])?;

        for col in order {
            let Some(converter) = &converters[col] else {
                continue;
            };
            let critical = array.data_types()[col].is_critical();
            for (index, row) in rows.iter().enumerate() {
                let Some(raw) = row.get(col) else {
                    continue;
                };
                let converted = {
                    let dependencies: Vec<Option<&DataValue>> = requires[col]
                        .iter()
                        .map(|&needed| array.value(index, needed))
                        .collect();
                    converter.convert_with(raw, &dependencies)
                };
                match converted {
                    Ok(value) => array.set_value(index, col, value)?,
                    Err(ConvertError::InvalidValue(message)) => {
                        trace!(row = row_numbers[index], column = %headers[col], "unconvertible value");
                        let severity = if critical {
                            Severity::Critical
                        } else {
                            Severity::Error
                        };
                        diagnostics.push(
                            Diagnostic::new(severity, message.clone())
                                .with_detail(format!("{message}: \"{raw}\""))
                                .at_row(row_numbers[index])
                                .at_column(col + 1, headers[col].clone()),
                        );
                    }
                    Err(err) => {
                        return Err(StandardizeError::configuration(format!(
                            "column '{}': {err}",
                            headers[col]
                        )));
                    }
                }
            }
        }

        for col in synthesized {
            let name = array.data_types()[col].var_name().to_string();
            for index in 0..num_samples {
                let value = if name == names::SAMPLE_NUMBER {
                    let number = i32::try_from(index + 1).map_err(|_| {
                        StandardizeError::configuration("too many samples to number")
                    })?;
                    DataValue::Int(number)
                } else {
                    DataValue::Char(woce::ACCEPTABLE)
                };
                array.set_value(index, col, Some(value))?;
            }
        }
        if let Some(flags) = &options.autocheck_flags {
            if flags.len() != num_samples {
                return Err(StandardizeError::configuration(format!(
                    "{} automatic QC flags given for {num_samples} rows",
                    flags.len()
                )));
            }
            for (index, &flag) in flags.iter().enumerate() {
                array.set_autocheck_flag(index, flag)?;
            }
        }

        let time_spec = TimeSpec::detect(&array);
        let sample_times = match &time_spec {
            Some(spec) => (0..num_samples)
                .map(|index| spec.sample_time(&array, index))
                .collect(),
            None => {
                warn!("no complete sample date/time specification");
                vec![None; num_samples]
            }
        };

        info!(
            samples = num_samples,
            columns = array.num_columns(),
            diagnostics = diagnostics.len(),
            duration_ms = start.elapsed().as_millis(),
            "standardized data"
        );
        Ok(Self {
            array,
            headers,
            units,
            user_columns,
            row_numbers,
            diagnostics,
            time_spec,
            sample_times,
        })
    }

    pub fn array(&self) -> &StdDataArray {
        &self.array
    }

    pub fn num_samples(&self) -> usize {
        self.array.num_samples()
    }

    /// Number of columns given by the submission, before the synthesized ones.
    pub fn num_user_columns(&self) -> usize {
        self.user_columns
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn row_numbers(&self) -> &[usize] {
        &self.row_numbers
    }

    /// Row number reported for a 0-based row index.
    pub fn row_number(&self, index: usize) -> usize {
        self.row_numbers.get(index).copied().unwrap_or(index + 1)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn time_spec(&self) -> Option<&TimeSpec> {
        self.time_spec.as_ref()
    }

    /// Columns the sample times were computed from; empty without a
    /// complete specification.
    pub fn time_columns(&self) -> Vec<usize> {
        self.time_spec.map(|spec| spec.columns()).unwrap_or_default()
    }

    pub fn sample_times(&self) -> &[Option<f64>] {
        &self.sample_times
    }

    pub fn set_autocheck_flag(&mut self, index: usize, flag: char) -> Result<()> {
        self.array.set_autocheck_flag(index, flag)
    }
}

impl StdDataArray {
    /// Projects a standardized submission onto the file data types.
    ///
    /// `time` comes from the sample times. Year through second are
    /// recomputed from them when the submission did not give them. Types
    /// with no source are left missing.
    pub fn from_user_array(user: &StdUserDataArray, data: &TypeRegistry) -> Result<Self> {
        let source = user.array();
        let types: Vec<DataType> = data.iter().cloned().collect();
        let mut array = StdDataArray::filled(types, source.num_samples());
        for col in 0..array.num_columns() {
            let target = array.data_types()[col].clone();
            let from = (0..source.num_columns()).find(|&other| {
                source.is_usable(other) && source.data_types()[other].type_name_equals(&target)
            });
            if let Some(from) = from {
                if source.data_types()[from].kind() != target.kind() {
                    warn!(
                        name = target.var_name(),
                        "user column kind differs from the file data type"
                    );
                    continue;
                }
                for row in 0..source.num_samples() {
                    array.set_value(row, col, source.value(row, from).cloned())?;
                }
            } else if target.var_name() == names::TIME {
                for (row, time) in user.sample_times().iter().enumerate() {
                    array.set_value(row, col, time.map(DataValue::Double))?;
                }
            } else if is_time_part(target.var_name()) {
                for (row, time) in user.sample_times().iter().enumerate() {
                    let value = time.and_then(|seconds| time_part(target.var_name(), seconds));
                    array.set_value(row, col, value)?;
                }
            }
        }
        Ok(array)
    }
}

fn is_time_part(name: &str) -> bool {
    matches!(
        name,
        names::YEAR
            | names::MONTH_OF_YEAR
            | names::DAY_OF_MONTH
            | names::HOUR_OF_DAY
            | names::MINUTE_OF_HOUR
            | names::SECOND_OF_MINUTE
    )
}

fn time_part(name: &str, seconds: f64) -> Option<DataValue> {
    let whole = seconds.floor();
    let stamp = DateTime::from_timestamp(whole as i64, 0)?;
    let int = |value: u32| i32::try_from(value).ok().map(DataValue::Int);
    match name {
        names::YEAR => Some(DataValue::Int(stamp.year())),
        names::MONTH_OF_YEAR => int(stamp.month()),
        names::DAY_OF_MONTH => int(stamp.day()),
        names::HOUR_OF_DAY => int(stamp.hour()),
        names::MINUTE_OF_HOUR => int(stamp.minute()),
        names::SECOND_OF_MINUTE => Some(DataValue::Double(
            f64::from(stamp.second()) + (seconds - whole),
        )),
        _ => None,
    }
}
