use dsg_core::{ColumnAssignment, StandardizeOptions};
use dsg_model::{Severity, woce};
use dsg_standards::{Registries, load_builtin_registries, names};
use dsg_validate::{CheckStatus, Standardized, standardize};

fn registries() -> Registries {
    load_builtin_registries().expect("builtin registries")
}

fn assign(registries: &Registries, header: &str, name: &str, unit: &str) -> ColumnAssignment {
    let data_type = registries.user.get(name).expect("user type").clone();
    ColumnAssignment::new(header, data_type).with_unit(unit)
}

fn read_tsv(text: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let headers = lines
        .next()
        .expect("header line")
        .split('\t')
        .map(ToString::to_string)
        .collect();
    let rows = lines
        .map(|line| line.split('\t').map(ToString::to_string).collect())
        .collect();
    (headers, rows)
}

fn underway() -> Standardized {
    let registries = registries();
    let (headers, rows) = read_tsv(include_str!("data/underway.tsv"));
    let columns = [
        (names::EXPOCODE, ""),
        (names::DATE, "yyyy-mm-dd"),
        (names::TIME_OF_DAY, "hh:mm:ss"),
        (names::LONGITUDE, "deg E"),
        (names::LATITUDE, "deg N"),
        (names::SST, "degrees C"),
        ("sal", "PSU"),
        ("fCO2_water_sst_100humidity_uatm", "uatm"),
    ];
    let assignments: Vec<ColumnAssignment> = headers
        .iter()
        .zip(columns)
        .map(|(header, (name, unit))| assign(&registries, header, name, unit))
        .collect();
    standardize(&rows, &assignments, &registries, &StandardizeOptions::default())
        .expect("standardize underway data")
}

#[test]
fn underway_diagnostics() {
    let checked = underway();
    let lines: Vec<String> = checked
        .diagnostics()
        .iter()
        .map(ToString::to_string)
        .collect();
    insta::assert_json_snapshot!(lines);
}

#[test]
fn underway_status_and_flags() {
    let checked = underway();
    assert_eq!(checked.status, CheckStatus::Unacceptable);

    let counts = checked.severity_counts();
    assert_eq!(counts.critical, 8);
    assert_eq!(counts.error, 11);
    assert_eq!(counts.warning, 1);

    let flags = checked.data.array().autocheck_flags().unwrap();
    let bad: Vec<usize> = flags
        .iter()
        .enumerate()
        .filter(|(_, flag)| **flag == Some(woce::BAD))
        .map(|(index, _)| index + 1)
        .collect();
    // The questionable temperature on row 3 is only a warning.
    assert_eq!(bad, vec![6, 8, 14, 20, 21, 23, 25]);
    assert_eq!(flags[2], Some(woce::ACCEPTABLE));
}

#[test]
fn missing_position_and_time_columns() {
    let registries = registries();
    let assignments = vec![assign(&registries, "SST", names::SST, "degrees C")];
    let rows = vec![vec!["12.5".to_string()], vec!["12.6".to_string()]];
    let checked = standardize(&rows, &assignments, &registries, &StandardizeOptions::default())
        .unwrap();

    let general: Vec<&str> = checked
        .diagnostics()
        .iter()
        .map(|d| d.general.as_str())
        .collect();
    assert_eq!(
        general,
        vec![
            "no longitude column",
            "no latitude column",
            "missing columns for sample date/time specification",
        ]
    );
    assert!(checked.diagnostics().iter().all(|d| d.row.is_none()));
    assert_eq!(checked.status, CheckStatus::Unacceptable);
    // Unattached diagnostics flag no rows.
    assert_eq!(
        checked.data.array().autocheck_flags().unwrap(),
        vec![Some(woce::ACCEPTABLE); 2]
    );
}

#[test]
fn clean_track_is_acceptable() {
    let registries = registries();
    let assignments = vec![
        assign(&registries, "when", names::DATE_TIME, "yyyy-mm-dd hh:mm:ss"),
        assign(&registries, "lon", names::LONGITUDE, "deg E"),
        assign(&registries, "lat", names::LATITUDE, "deg N"),
    ];
    let rows: Vec<Vec<String>> = [
        ["2012-06-01 00:00:00", "150.00", "-40.00"],
        ["2012-06-01 00:10:00", "150.02", "-40.01"],
        ["2012-06-01 00:20:00", "150.04", "-40.02"],
    ]
    .iter()
    .map(|row| row.iter().map(ToString::to_string).collect())
    .collect();
    let checked = standardize(&rows, &assignments, &registries, &StandardizeOptions::default())
        .unwrap();
    assert!(checked.diagnostics().is_empty(), "{:?}", checked.diagnostics());
    assert_eq!(checked.status, CheckStatus::Acceptable);
}

#[test]
fn repeated_rows_point_back_to_the_first() {
    let registries = registries();
    let assignments = vec![
        assign(&registries, "when", names::DATE_TIME, "yyyy-mm-dd hh:mm:ss"),
        assign(&registries, "lon", names::LONGITUDE, "deg E"),
        assign(&registries, "lat", names::LATITUDE, "deg N"),
        assign(&registries, "flag", names::WOCE_CO2_WATER, ""),
        assign(&registries, "note", "comment_WOCE_CO2_water", ""),
    ];
    // Rows 2 and 3 repeat row 1; row 4 only changes the flag and comment.
    let rows: Vec<Vec<String>> = [
        ["2012-06-01 00:00:00", "150.00", "-40.00", "2", "ok"],
        ["2012-06-01 00:00:00", "150.00", "-40.00", "2", "ok"],
        ["2012-06-01 00:00:00", "150.00", "-40.00", "2", "ok"],
        ["2012-06-01 00:00:00", "150.00", "-40.00", "3", "suspect"],
        ["2012-06-01 00:10:00", "150.02", "-40.01", "2", "ok"],
    ]
    .iter()
    .map(|row| row.iter().map(ToString::to_string).collect())
    .collect();
    let checked = standardize(&rows, &assignments, &registries, &StandardizeOptions::default())
        .unwrap();

    let duplicates: Vec<(Option<usize>, &str)> = checked
        .diagnostics()
        .iter()
        .filter(|diag| diag.general == "duplicate data row")
        .map(|diag| (diag.row, diag.detailed.as_str()))
        .collect();
    assert_eq!(
        duplicates,
        vec![
            (Some(2), "duplicate of row 1"),
            (Some(3), "duplicate of row 1"),
            (Some(4), "duplicate of row 1"),
        ]
    );
}

#[test]
fn speed_limits_come_from_the_options() {
    let registries = registries();
    let assignments = vec![
        assign(&registries, "when", names::DATE_TIME, "yyyy-mm-dd hh:mm:ss"),
        assign(&registries, "lon", names::LONGITUDE, "deg E"),
        assign(&registries, "lat", names::LATITUDE, "deg N"),
    ];
    // About 12 knots.
    let rows: Vec<Vec<String>> = [
        ["2012-06-01 00:00:00", "0.0", "0.0"],
        ["2012-06-01 01:00:00", "0.0", "0.2"],
    ]
    .iter()
    .map(|row| row.iter().map(ToString::to_string).collect())
    .collect();
    let options = StandardizeOptions::default().with_speed_limits(5.0, 30.0);
    let checked = standardize(&rows, &assignments, &registries, &options).unwrap();

    assert_eq!(checked.status, CheckStatus::Warnings(3));
    let first = &checked.diagnostics()[0];
    assert_eq!(first.severity, Severity::Warning);
    assert_eq!(first.row, Some(2));
    assert_eq!(first.general, "calculated speed exceeds 5 knots");
    assert_eq!(first.column_name.as_deref(), Some("lon"));
}

#[test]
fn status_serializes_with_its_count() {
    let json = serde_json::to_value(CheckStatus::Errors(4)).unwrap();
    assert_eq!(json, serde_json::json!({"status": "errors", "count": 4}));
    let json = serde_json::to_value(CheckStatus::Acceptable).unwrap();
    assert_eq!(json, serde_json::json!({"status": "acceptable"}));
}
