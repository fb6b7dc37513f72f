//! Assignment of data file columns to data types.

use dsg_core::ColumnAssignment;
use dsg_standards::{Registries, names};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::manifest::ColumnSpec;

/// Assigns a type to every header, in header order.
///
/// Columns declared in the manifest use the declared type, unit and
/// missing-value string. Other headers are matched against the user
/// types by name; a header that matches nothing is assigned `unknown`
/// and ignored during standardization.
pub fn assign_columns(
    headers: &[String],
    specs: &[ColumnSpec],
    registries: &Registries,
) -> Result<Vec<ColumnAssignment>> {
    for spec in specs {
        if !headers.iter().any(|header| header_matches(header, &spec.header)) {
            return Err(IngestError::manifest(format!(
                "column '{}' is not in the data file",
                spec.header
            )));
        }
    }
    let unknown = registries.user.require(names::UNKNOWN)?;

    let mut assignments = Vec::with_capacity(headers.len());
    for header in headers {
        let spec = specs.iter().find(|spec| header_matches(header, &spec.header));
        let assignment = match spec {
            Some(spec) => {
                let data_type = registries.user.lookup(&spec.type_name).ok_or_else(|| {
                    IngestError::UnknownType {
                        column: spec.header.clone(),
                        name: spec.type_name.clone(),
                    }
                })?;
                let mut assignment = ColumnAssignment::new(header.clone(), data_type.clone());
                if let Some(unit) = &spec.unit {
                    assignment = assignment.with_unit(unit.trim());
                }
                if let Some(missing) = &spec.missing {
                    assignment = assignment.with_missing(missing.clone());
                }
                assignment
            }
            None => match registries.user.lookup_column(header, None) {
                Some(data_type) => ColumnAssignment::new(header.clone(), data_type.clone()),
                None => {
                    warn!(column = %header, "no data type matches the column; it will be ignored");
                    ColumnAssignment::new(header.clone(), unknown.clone())
                }
            },
        };
        debug!(
            column = %header,
            data_type = assignment.data_type.var_name(),
            unit = %assignment.unit,
            "assigned column"
        );
        assignments.push(assignment);
    }
    Ok(assignments)
}

fn header_matches(header: &str, declared: &str) -> bool {
    header.trim().eq_ignore_ascii_case(declared.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsg_standards::load_builtin_registries;

    fn spec(header: &str, type_name: &str, unit: Option<&str>) -> ColumnSpec {
        ColumnSpec {
            header: header.to_string(),
            type_name: type_name.to_string(),
            unit: unit.map(str::to_string),
            missing: None,
        }
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn declared_then_matched_then_unknown() {
        let registries = load_builtin_registries().unwrap();
        let specs = vec![spec("SST", "temp", Some("K"))];
        let assignments = assign_columns(
            &headers(&["longitude", "sst", "Comments by PI"]),
            &specs,
            &registries,
        )
        .unwrap();

        let found: Vec<(&str, &str, &str)> = assignments
            .iter()
            .map(|a| (a.header.as_str(), a.data_type.var_name(), a.unit.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("longitude", "longitude", ""),
                ("sst", "temp", "K"),
                ("Comments by PI", "unknown", ""),
            ]
        );
        assert!(assignments[2].is_ignored());
    }

    #[test]
    fn declared_columns_must_exist_and_resolve() {
        let registries = load_builtin_registries().unwrap();
        let missing = assign_columns(
            &headers(&["lat"]),
            &[spec("salinity", "sal", None)],
            &registries,
        );
        assert!(matches!(missing, Err(IngestError::InvalidManifest { .. })));

        let unknown = assign_columns(
            &headers(&["lat"]),
            &[spec("lat", "latitude_degrees", None)],
            &registries,
        );
        assert!(matches!(
            unknown,
            Err(IngestError::UnknownType { ref name, .. }) if name == "latitude_degrees"
        ));
    }
}
