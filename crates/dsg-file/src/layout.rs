//! How data types map onto NetCDF variables.
//!
//! | kind      | metadata variable            | data variable            |
//! |-----------|------------------------------|--------------------------|
//! | String    | char (trajectory, meta len)  | char (obs, data len)     |
//! | Integer   | int (trajectory)             | int (obs)                |
//! | Double    | double (trajectory)          | double (obs)             |
//! | Character | char (trajectory)            | char (obs)               |

use dsg_model::{
    CHAR_MISSING_VALUE, DataKind, DataType, DataValue, FP_MISSING_VALUE, INT_MISSING_VALUE,
    is_fp_missing,
};
use dsg_nc::{Attribute, NcDefinition, NcType, Values, text_rows};

pub const TRAJECTORY_DIM: &str = "trajectory";
pub const METADATA_STRLEN_DIM: &str = "metadata_string_length";
pub const OBS_DIM: &str = "obs";
pub const DATA_STRLEN_DIM: &str = "data_string_length";

pub const NUM_OBS: &str = "num_obs";
pub const HISTORY: &str = "DsgNcFile 2.0";
pub const TIME_ORIGIN: &str = "01-JAN-1970 00:00:00";

/// Dimension indices of one side (metadata or data) of the file.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Axes {
    pub rows: usize,
    pub string_len: usize,
}

pub(crate) fn nc_type(kind: DataKind) -> NcType {
    match kind {
        DataKind::String | DataKind::Character => NcType::Char,
        DataKind::Integer => NcType::Int,
        DataKind::Double => NcType::Double,
    }
}

/// Adds the variable for `data_type` with its attributes.
pub(crate) fn define_variable(
    definition: &mut NcDefinition,
    data_type: &DataType,
    axes: Axes,
    dataset_id: bool,
) -> dsg_nc::Result<()> {
    let kind = data_type.kind();
    let dimensions: &[usize] = match kind {
        DataKind::String => &[axes.rows, axes.string_len],
        _ => &[axes.rows],
    };
    let var = definition.add_variable(data_type.var_name(), nc_type(kind), dimensions)?;

    match kind {
        DataKind::Integer => {
            definition.add_variable_attribute(var, Attribute::int("missing_value", INT_MISSING_VALUE))?;
            definition.add_variable_attribute(var, Attribute::int("_FillValue", INT_MISSING_VALUE))?;
        }
        DataKind::Double => {
            definition.add_variable_attribute(var, Attribute::double("missing_value", FP_MISSING_VALUE))?;
            definition.add_variable_attribute(var, Attribute::double("_FillValue", FP_MISSING_VALUE))?;
        }
        DataKind::String | DataKind::Character => {}
    }
    let long_name = data_type
        .description()
        .unwrap_or_else(|| data_type.display_name());
    definition.add_variable_attribute(var, Attribute::text("long_name", long_name))?;
    if let Some(standard_name) = data_type.standard_name() {
        definition.add_variable_attribute(var, Attribute::text("standard_name", standard_name))?;
        if standard_name.ends_with("depth") {
            definition.add_variable_attribute(var, Attribute::text("positive", "down"))?;
        }
    }
    if let Some(category) = data_type.category() {
        definition.add_variable_attribute(var, Attribute::text("ioos_category", category))?;
    }
    let units = data_type.file_std_unit();
    if !units.is_empty() {
        definition.add_variable_attribute(var, Attribute::text("units", units))?;
    }
    if data_type.is_time_like() {
        definition.add_variable_attribute(var, Attribute::text("time_origin", TIME_ORIGIN))?;
    }
    if dataset_id {
        definition.add_variable_attribute(var, Attribute::text("cf_role", "trajectory_id"))?;
    }
    Ok(())
}

/// Column values encoded for one variable.
pub(crate) enum Encoded {
    Text(Vec<String>),
    Values(Values),
}

/// Encodes a column, replacing missing values with the kind's sentinel.
pub(crate) fn encode(kind: DataKind, values: &[Option<&DataValue>]) -> Encoded {
    match kind {
        DataKind::String => Encoded::Text(
            values
                .iter()
                .map(|value| value.and_then(DataValue::as_str).unwrap_or("").to_string())
                .collect(),
        ),
        DataKind::Integer => Encoded::Values(Values::Ints(
            values
                .iter()
                .map(|value| value.and_then(DataValue::as_int).unwrap_or(INT_MISSING_VALUE))
                .collect(),
        )),
        DataKind::Double => Encoded::Values(Values::Doubles(
            values
                .iter()
                .map(|value| finite_or_missing(value.and_then(DataValue::as_double)))
                .collect(),
        )),
        DataKind::Character => Encoded::Values(Values::Chars(
            values
                .iter()
                .map(|value| {
                    value
                        .and_then(DataValue::as_char)
                        .and_then(|ch| u8::try_from(ch).ok())
                        .unwrap_or(b' ')
                })
                .collect(),
        )),
    }
}

/// Doubles as written: NaN, infinities and absent values become the sentinel.
pub fn finite_or_missing(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(FP_MISSING_VALUE)
}

/// Decodes the values of a variable of the given kind; sentinels become `None`.
///
/// `row_len` is the string dimension of String variables.
pub(crate) fn decode(kind: DataKind, values: Values, row_len: usize) -> Option<Vec<Option<DataValue>>> {
    let decoded = match (kind, values) {
        (DataKind::String, Values::Chars(chars)) => text_rows(&chars, row_len)
            .into_iter()
            .map(|text| {
                let text = text.trim();
                (!text.is_empty()).then(|| DataValue::from(text))
            })
            .collect(),
        (DataKind::Character, Values::Chars(chars)) => chars
            .into_iter()
            .map(|byte| {
                let ch = char::from(byte);
                (ch != CHAR_MISSING_VALUE && ch != '\0').then_some(DataValue::Char(ch))
            })
            .collect(),
        (DataKind::Integer, Values::Ints(ints)) => ints
            .into_iter()
            .map(|v| (v != INT_MISSING_VALUE).then_some(DataValue::Int(v)))
            .collect(),
        (DataKind::Double, Values::Doubles(doubles)) => doubles
            .into_iter()
            .map(|v| (!is_fp_missing(v)).then_some(DataValue::Double(v)))
            .collect(),
        _ => return None,
    };
    Some(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_round_trip_to_none() {
        let one = DataValue::Double(1.5);
        let nan = DataValue::Double(f64::NAN);
        let Encoded::Values(values) = encode(DataKind::Double, &[Some(&one), None, Some(&nan)]) else {
            panic!("doubles are not text");
        };
        assert_eq!(
            values,
            Values::Doubles(vec![1.5, FP_MISSING_VALUE, FP_MISSING_VALUE])
        );
        assert_eq!(
            decode(DataKind::Double, values, 0),
            Some(vec![Some(DataValue::Double(1.5)), None, None])
        );
    }

    #[test]
    fn characters_are_single_bytes() {
        let flag = DataValue::Char('4');
        let Encoded::Values(values) = encode(DataKind::Character, &[Some(&flag), None]) else {
            panic!("characters are not text");
        };
        assert_eq!(values, Values::Chars(vec![b'4', b' ']));
        assert_eq!(
            decode(DataKind::Character, values, 0),
            Some(vec![Some(DataValue::Char('4')), None])
        );
    }

    #[test]
    fn strings_are_trimmed() {
        let chars = b"  33RO\0\0        ".to_vec();
        assert_eq!(
            decode(DataKind::String, Values::Chars(chars), 8),
            Some(vec![Some(DataValue::from("33RO")), None])
        );
        assert_eq!(decode(DataKind::Integer, Values::Doubles(vec![1.0]), 0), None);
    }
}
