//! Submission to DSG file and back.

use std::path::Path;

use dsg_file::{DsgFile, FlagUpdate};
use dsg_model::{DataLocation, DataValue};
use dsg_standards::names;

fn manifest() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../dsg-ingest/tests/data/manifest.toml")
}

#[test]
fn submission_is_written_and_reflagged() {
    let submission = dsg_ingest::load_submission(&manifest()).unwrap();
    let checked = dsg_validate::standardize(
        &submission.table.rows,
        &submission.assignments,
        &submission.registries,
        &submission.manifest.options(),
    )
    .unwrap();
    let metadata = submission.metadata(&checked.data).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let file = DsgFile::new(dir.path().join("33RO20100105.nc"));
    file.create_from_user_data(&metadata, &checked.data, &submission.registries.data)
        .unwrap();

    let (read_metadata, _) = file.read_metadata(&submission.registries.metadata).unwrap();
    assert_eq!(read_metadata.dataset_id(), Some("33RO20100105"));
    assert_eq!(read_metadata.platform_type(), Some("Ship"));

    let (data, _) = file.read_data(&submission.registries.data).unwrap();
    assert_eq!(data.num_samples(), 3);
    assert_eq!(
        data.sample_times().unwrap(),
        vec![
            Some(1_262_692_800.0),
            Some(1_262_693_400.0),
            Some(1_262_694_000.0)
        ]
    );

    let mut update = FlagUpdate::new(
        names::WOCE_CO2_WATER,
        '3',
        vec![
            DataLocation::new(-24.28, 43.21, 1_262_693_400.0),
            DataLocation::new(10.0, 43.21, 1_262_693_400.0),
        ],
    );
    let unmatched = file.update_flags_by_location(&mut update, true).unwrap();
    assert_eq!(unmatched, vec![DataLocation::new(10.0, 43.21, 1_262_693_400.0)]);
    assert_eq!(update.locations[0].row_number, Some(2));

    let (data, _) = file.read_data(&submission.registries.data).unwrap();
    let col = data.column_index(names::WOCE_CO2_WATER).unwrap();
    assert_eq!(data.value(1, col), Some(&DataValue::Char('3')));
    assert_eq!(data.value(0, col), None);
}
