use dsg_core::{
    ColumnAssignment, StandardizeError, StandardizeOptions, StdDataArray, StdUserDataArray,
    TimeSpec,
};
use dsg_model::{DataValue, Severity};
use dsg_standards::{Registries, load_builtin_registries, names};

fn registries() -> Registries {
    load_builtin_registries().expect("builtin registries")
}

fn assign(registries: &Registries, header: &str, name: &str, unit: &str) -> ColumnAssignment {
    let data_type = registries.user.get(name).expect("user type").clone();
    ColumnAssignment::new(header, data_type).with_unit(unit)
}

fn rows(text: &[&[&str]]) -> Vec<Vec<String>> {
    text.iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect()
}

#[test]
fn depth_in_dbar_is_converted_after_latitude() {
    let registries = registries();
    let assignments = vec![
        assign(&registries, "Depth", names::SAMPLE_DEPTH, "dbar"),
        assign(&registries, "Lat", names::LATITUDE, "deg N"),
        assign(&registries, "Lon", names::LONGITUDE, "deg W"),
        assign(&registries, "Date", names::DATE_TIME, "yyyy-mm-dd hh:mm:ss"),
    ];
    let data = rows(&[
        &["10000", "30", "20.5", "2010-01-05 12:00"],
        &["5", "", "20.6", "2010-01-05 13:00"],
    ]);
    let user = StdUserDataArray::standardize(
        &data,
        &assignments,
        &registries,
        &StandardizeOptions::default(),
    )
    .unwrap();

    let depths = user.array().sample_depths().unwrap();
    assert!((depths[0].unwrap() - 9712.653).abs() < 1e-3);
    assert_eq!(depths[1], None);
    assert_eq!(user.array().sample_longitudes().unwrap()[0], Some(-20.5));

    // Depth without latitude is an error on the depth cell only.
    assert_eq!(user.diagnostics().len(), 1);
    let diagnostic = &user.diagnostics()[0];
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.row, Some(2));
    assert_eq!(diagnostic.column, Some(1));
    assert_eq!(diagnostic.general, "no latitude to convert pressure to depth");
    assert_eq!(
        diagnostic.detailed,
        "no latitude to convert pressure to depth: \"5\""
    );

    assert!(matches!(user.time_spec(), Some(TimeSpec::DateTime { date_time: 3 })));
    assert_eq!(user.sample_times()[1], Some(1_262_696_400.0));
}

#[test]
fn synthesized_columns_are_appended() {
    let registries = registries();
    let assignments = vec![
        assign(&registries, "lon", names::LONGITUDE, "deg E"),
        assign(&registries, "lat", names::LATITUDE, "deg N"),
    ];
    let data = rows(&[&["1", "2"], &["3", "4"], &["5", "6"]]);
    let options = StandardizeOptions::default()
        .with_row_numbers(vec![10, 11, 12])
        .with_autocheck_flags(vec!['2', '4', '3']);
    let user = StdUserDataArray::standardize(&data, &assignments, &registries, &options).unwrap();

    assert_eq!(user.num_user_columns(), 2);
    assert_eq!(user.array().num_columns(), 4);
    assert_eq!(user.headers()[2], names::SAMPLE_NUMBER);
    assert_eq!(user.array().value(2, 2), Some(&DataValue::Int(3)));
    assert_eq!(
        user.array().autocheck_flags().unwrap(),
        vec![Some('2'), Some('4'), Some('3')]
    );
    assert_eq!(user.row_number(1), 11);
    assert_eq!(user.time_spec(), None);
    assert!(user.time_columns().is_empty());
}

#[test]
fn short_rows_and_bad_cells_become_diagnostics() {
    let registries = registries();
    let other = registries.user.get(names::OTHER).unwrap().clone();
    let assignments = vec![
        assign(&registries, "lat", names::LATITUDE, "deg N"),
        ColumnAssignment::new("notes", other),
        assign(&registries, "sst", names::SST, "degrees C"),
    ];
    let data = rows(&[&["12.5", "calm", "abc"], &["north"]]);
    let user = StdUserDataArray::standardize(
        &data,
        &assignments,
        &registries,
        &StandardizeOptions::default(),
    )
    .unwrap();

    assert!(!user.array().is_usable(1));
    assert_eq!(user.array().value(0, 1), None);

    let texts: Vec<(Severity, Option<usize>, &str)> = user
        .diagnostics()
        .iter()
        .map(|d| (d.severity, d.row, d.general.as_str()))
        .collect();
    assert_eq!(
        texts,
        vec![
            (
                Severity::Critical,
                Some(2),
                "inconstistent number of data values; 3 expected but 1 found"
            ),
            (Severity::Critical, Some(2), "not a valid number"),
            (Severity::Error, Some(1), "not a valid number"),
        ]
    );
}

#[test]
fn configuration_problems_are_fatal() {
    let registries = registries();
    let depth_only = vec![assign(&registries, "p", names::SAMPLE_DEPTH, "dbar")];
    let data = rows(&[&["10"]]);
    let err = StdUserDataArray::standardize(
        &data,
        &depth_only,
        &registries,
        &StandardizeOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        StandardizeError::UnresolvableColumn {
            column: "p".to_string(),
            required: names::LATITUDE.to_string(),
        }
    );

    let bad_unit = vec![assign(&registries, "sst", names::SST, "hPa")];
    assert!(matches!(
        StdUserDataArray::standardize(&data, &bad_unit, &registries, &StandardizeOptions::default()),
        Err(StandardizeError::InvalidConfiguration { .. })
    ));

    assert_eq!(
        StdUserDataArray::standardize(&[], &bad_unit, &registries, &StandardizeOptions::default())
            .unwrap_err(),
        StandardizeError::NoData
    );
}

#[test]
fn file_data_projection() {
    let registries = registries();
    let assignments = vec![
        assign(&registries, "date", names::DATE, "mm-dd-yyyy"),
        assign(&registries, "time", names::TIME_OF_DAY, "hh:mm:ss"),
        assign(&registries, "lon", names::LONGITUDE, "deg E"),
        assign(&registries, "lat", names::LATITUDE, "deg N"),
        assign(&registries, "sst", names::SST, "K"),
    ];
    let data = rows(&[&["01/05/2010", "12:30:15.5", "350", "45", "293.15"]]);
    let user = StdUserDataArray::standardize(
        &data,
        &assignments,
        &registries,
        &StandardizeOptions::default(),
    )
    .unwrap();
    let file = StdDataArray::from_user_array(&user, &registries.data).unwrap();

    assert_eq!(file.num_columns(), registries.data.len());
    let get = |name: &str| file.value(0, file.column_index(name).unwrap()).cloned();
    assert_eq!(get(names::TIME), Some(DataValue::Double(1_262_694_615.5)));
    assert_eq!(get(names::YEAR), Some(DataValue::Int(2010)));
    assert_eq!(get(names::MINUTE_OF_HOUR), Some(DataValue::Int(30)));
    assert_eq!(get(names::SECOND_OF_MINUTE), Some(DataValue::Double(15.5)));
    assert_eq!(get(names::LONGITUDE), Some(DataValue::Double(-10.0)));
    assert_eq!(get(names::SAMPLE_NUMBER), Some(DataValue::Int(1)));
    assert_eq!(get(names::WOCE_AUTOCHECK), Some(DataValue::Char('2')));
    assert_eq!(get(names::FCO2_REC), None);
    let sst = get(names::SST).and_then(|v| v.as_double()).unwrap();
    assert!((sst - 20.0).abs() < 1e-9);
}
