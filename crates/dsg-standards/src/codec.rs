//! Pipe-delimited property values for data type definitions.
//!
//! ```text
//! Kind|sortOrder|displayName|description|critical|unitCount|unit...|standardName|category|fileUnit|b0|b1|b2|b3|ROLE...
//! ```
//!
//! An empty field is an absent optional. `|` and `\` inside a field are
//! written as `\|` and `\\`.

use dsg_model::{Bounds, DataKind, DataType, DataValue, Role};

use crate::error::StandardsError;

/// Fields before the unit list.
const HEAD_FIELDS: usize = 6;
/// Fields between the unit list and the roles.
const TAIL_FIELDS: usize = 7;

pub fn to_property_value(data_type: &DataType) -> String {
    let mut fields: Vec<String> = Vec::with_capacity(HEAD_FIELDS + TAIL_FIELDS + 8);
    fields.push(data_type.kind().as_str().to_string());
    fields.push(data_type.sort_order().to_string());
    fields.push(data_type.display_name().to_string());
    fields.push(data_type.description().unwrap_or_default().to_string());
    fields.push(data_type.is_critical().to_string());
    fields.push(data_type.units().len().to_string());
    fields.extend(data_type.units().iter().cloned());
    fields.push(data_type.standard_name().unwrap_or_default().to_string());
    fields.push(data_type.category().unwrap_or_default().to_string());
    fields.push(
        data_type
            .explicit_file_std_unit()
            .unwrap_or_default()
            .to_string(),
    );
    for bound in data_type.bounds().as_array() {
        fields.push(bound.map(ToString::to_string).unwrap_or_default());
    }
    fields.extend(data_type.roles().iter().map(|role| role.as_str().to_string()));
    fields
        .iter()
        .map(|field| escape(field))
        .collect::<Vec<_>>()
        .join("|")
}

pub fn from_property_value(name: &str, value: &str) -> Result<DataType, StandardsError> {
    let fields = split_fields(value);
    if fields.len() < HEAD_FIELDS {
        return Err(StandardsError::property(
            name,
            format!("expected at least {HEAD_FIELDS} fields, found {}", fields.len()),
        ));
    }
    let kind: DataKind = fields[0]
        .parse()
        .map_err(|message: String| StandardsError::property(name, message))?;
    let sort_order: f64 = fields[1].trim().parse().map_err(|_| {
        StandardsError::property(name, format!("invalid sort order '{}'", fields[1]))
    })?;
    let critical = match fields[4].trim() {
        "true" => true,
        "false" => false,
        other => {
            return Err(StandardsError::property(
                name,
                format!("critical must be true or false, not '{other}'"),
            ));
        }
    };
    let unit_count: usize = fields[5].trim().parse().map_err(|_| {
        StandardsError::property(name, format!("invalid unit count '{}'", fields[5]))
    })?;
    let Some(tail_start) = HEAD_FIELDS
        .checked_add(unit_count)
        .filter(|start| start.saturating_add(TAIL_FIELDS) <= fields.len())
    else {
        return Err(StandardsError::property(
            name,
            format!(
                "{unit_count} units do not fit in {} fields",
                fields.len()
            ),
        ));
    };
    let units = &fields[HEAD_FIELDS..tail_start];
    let tail = &fields[tail_start..tail_start + TAIL_FIELDS];
    let bound = |text: &str| -> Result<Option<DataValue>, StandardsError> {
        if text.is_empty() {
            return Ok(None);
        }
        DataValue::parse(kind, text)
            .map(Some)
            .map_err(|message| StandardsError::property(name, message))
    };
    let bounds = Bounds::new(
        bound(&tail[3])?,
        bound(&tail[4])?,
        bound(&tail[5])?,
        bound(&tail[6])?,
    );
    let roles = fields[tail_start + TAIL_FIELDS..]
        .iter()
        .map(|text| text.parse::<Role>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|message| StandardsError::property(name, message))?;

    DataType::builder(name, kind, sort_order)
        .display_name(fields[2].as_str())
        .description(fields[3].as_str())
        .critical(critical)
        .units(units)
        .standard_name(tail[0].as_str())
        .category(tail[1].as_str())
        .file_std_unit(tail[2].as_str())
        .bounds(bounds)
        .roles(&roles)
        .build()
        .map_err(|err| StandardsError::property(name, err.to_string()))
}

fn escape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    for ch in field.chars() {
        if ch == '|' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn split_fields(value: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '|' => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_separators() {
        assert_eq!(escape("a|b\\c"), "a\\|b\\\\c");
        assert_eq!(split_fields("a\\|b|c\\\\"), vec!["a|b", "c\\"]);
    }

    #[test]
    fn parses_catalog_entry() {
        let dtype = from_property_value(
            "sample_depth",
            "Double|303|sample depth||false|2|meters|dbar|depth|Bathymetry|meters|0|||16000|USER_DATA|FILE_DATA",
        )
        .unwrap();
        assert_eq!(dtype.units(), &["meters".to_string(), "dbar".to_string()]);
        assert_eq!(dtype.description(), None);
        assert_eq!(dtype.standard_name(), Some("depth"));
        assert_eq!(dtype.bounds().max_question, Some(DataValue::Double(16000.0)));
        assert_eq!(dtype.bounds().min_accept, None);
        assert!(dtype.has_role(Role::UserData));
        assert!(!dtype.has_role(Role::FileMetadata));
    }

    #[test]
    fn rejects_short_and_malformed_values() {
        assert!(from_property_value("x", "Double|1").is_err());
        assert!(from_property_value("x", "Float|1|x||false|1||||||||").is_err());
        assert!(from_property_value("x", "Double|1|x||yes|1||||||||").is_err());
        let err = from_property_value("x", "Double|1|x||false|18446744073709551615|a").unwrap_err();
        assert!(matches!(err, StandardsError::InvalidProperty { .. }));
        assert!(from_property_value("x", "Double|1|x||false|9|a|b||||||||").is_err());
        assert!(from_property_value("x", "Double|1|x||false|3|a||||||||").is_err());
        let err = from_property_value("x", "Double|1|x||false|1|||||||||NOPE").unwrap_err();
        assert!(err.to_string().contains("unknown data type role"));
    }
}
