use std::path::{Path, PathBuf};

use dsg_ingest::{IngestError, load_manifest, load_submission};

fn manifest_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/manifest.toml")
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("value present");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, found {actual}"
    );
}

#[test]
fn manifest_and_table_are_loaded() {
    let submission = load_submission(&manifest_path()).unwrap();
    assert_eq!(submission.manifest.input.path, PathBuf::from("underway.tsv"));
    assert_eq!(submission.table.rows.len(), 3);
    assert_eq!(
        submission.table.headers,
        vec!["Date Time", "Lon", "Lat", "SST", "Salinity", "fCO2 wet", "Remarks"]
    );

    let types: Vec<&str> = submission
        .assignments
        .iter()
        .map(|a| a.data_type.var_name())
        .collect();
    assert_eq!(
        types,
        vec![
            "date_time",
            "longitude",
            "latitude",
            "temp",
            "sal",
            "fCO2_water_sst_100humidity_uatm",
            "unknown",
        ]
    );
    assert_eq!(submission.assignments[3].missing.as_deref(), Some("-999"));

    let options = submission.manifest.options();
    assert_eq!(options.speed_warning_knots, 25.0);
    assert_eq!(options.speed_error_knots, 60.0);
}

#[test]
fn submission_standardizes_with_metadata() {
    let submission = load_submission(&manifest_path()).unwrap();
    let user = submission.standardize().unwrap();
    assert!(user.diagnostics().is_empty(), "{:?}", user.diagnostics());

    let longitudes = user.array().sample_longitudes().unwrap();
    assert_close(longitudes[0], -24.30);
    assert_close(longitudes[2], -24.26);
    let sst_col = user.array().column_index("temp").unwrap();
    assert_eq!(user.array().value(2, sst_col), None);
    assert_eq!(user.sample_times()[1], Some(1_262_693_400.0));

    let metadata = submission.metadata(&user).unwrap();
    assert_eq!(metadata.dataset_id(), Some("33RO20100105"));
    assert_eq!(metadata.platform_name(), Some("Ronald H. Brown"));
    assert_eq!(metadata.version(), Some("2.0"));
    assert_close(metadata.westmost_longitude(), -24.30);
    assert_close(metadata.eastmost_longitude(), -24.26);
    assert_close(metadata.southmost_latitude(), 43.20);
    assert_close(metadata.northmost_latitude(), 43.22);
    assert_eq!(metadata.begin_time(), Some(1_262_692_800.0));
    assert_eq!(metadata.end_time(), Some(1_262_694_000.0));
}

#[test]
fn missing_data_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("manifest.toml");
    std::fs::write(&manifest, "[input]\npath = \"absent.tsv\"\n").unwrap();

    let loaded = load_manifest(&manifest).unwrap();
    assert_eq!(loaded.data_path(), dir.path().join("absent.tsv"));

    match load_submission(&manifest) {
        Err(IngestError::Io { path, .. }) => assert_eq!(path, dir.path().join("absent.tsv")),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn malformed_manifests_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("manifest.toml");
    std::fs::write(&manifest, "[input\npath = 3\n").unwrap();
    assert!(matches!(
        load_manifest(&manifest),
        Err(IngestError::Toml { .. })
    ));

    std::fs::write(
        &manifest,
        "[input]\npath = \"a.tsv\"\n\n[[columns]]\nheader = \"SST\"\ntype = \"temp\"\n\n[[columns]]\nheader = \"sst\"\ntype = \"sal\"\n",
    )
    .unwrap();
    assert!(matches!(
        load_manifest(&manifest),
        Err(IngestError::InvalidManifest { .. })
    ));
}
