use dsg_nc::{Attribute, NcDefinition, NcError, NcFile, NcPatcher, NcType, NcWriter, Values};
use proptest::prelude::*;
use tempfile::TempDir;

fn trajectory_definition(num_obs: usize) -> NcDefinition {
    let mut definition = NcDefinition::new();
    let traj = definition.add_dimension("trajectory", 1).unwrap();
    let obs = definition.add_dimension("obs", num_obs).unwrap();
    let strlen = definition.add_dimension("string_length", 32).unwrap();
    definition.add_global_attribute(Attribute::text("featureType", "Trajectory"));

    let id = definition
        .add_variable("expocode", NcType::Char, &[traj, strlen])
        .unwrap();
    definition
        .add_variable_attribute(id, Attribute::text("cf_role", "trajectory_id"))
        .unwrap();
    let time = definition.add_variable("time", NcType::Double, &[obs]).unwrap();
    definition
        .add_variable_attribute(time, Attribute::double("missing_value", -1.0E34))
        .unwrap();
    definition.add_variable("count", NcType::Int, &[traj]).unwrap();
    definition.add_variable("flag", NcType::Char, &[obs]).unwrap();
    definition
}

#[test]
fn written_values_read_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("track.nc");

    let mut writer = NcWriter::create(&path, trajectory_definition(3)).unwrap();
    writer.put_text_rows("expocode", &["33RO20100105"]).unwrap();
    writer
        .put("time", &Values::Doubles(vec![0.0, 60.0, -1.0E34]))
        .unwrap();
    writer.put("count", &Values::Ints(vec![3])).unwrap();
    writer.finish().unwrap();

    let file = NcFile::open(&path).unwrap();
    assert_eq!(file.dimension_len("obs").unwrap(), 3);
    assert_eq!(
        file.header().attribute("featureType").and_then(Attribute::as_text),
        Some("Trajectory".to_string())
    );
    assert_eq!(file.read_text_rows("expocode").unwrap(), vec!["33RO20100105"]);
    assert_eq!(file.read_doubles("time").unwrap(), vec![0.0, 60.0, -1.0E34]);
    assert_eq!(file.read_ints("count").unwrap(), vec![3]);
    // Never written, so still the default fill.
    assert_eq!(file.read_chars("flag").unwrap(), vec![0, 0, 0]);
    let time = file.variable("time").unwrap();
    assert_eq!(
        time.attribute("missing_value").map(|a| a.values.clone()),
        Some(Values::Doubles(vec![-1.0E34]))
    );
}

#[test]
fn writes_are_checked_against_the_definition() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("track.nc");
    let mut writer = NcWriter::create(&path, trajectory_definition(2)).unwrap();

    assert!(matches!(
        writer.put("time", &Values::Doubles(vec![0.0])),
        Err(NcError::ShapeMismatch {
            expected: 2,
            actual: 1,
            ..
        })
    ));
    assert!(matches!(
        writer.put("time", &Values::Ints(vec![0, 1])),
        Err(NcError::TypeMismatch { .. })
    ));
    assert!(matches!(
        writer.put_text_rows("expocode", &["x".repeat(33)]),
        Err(NcError::StringTooLong {
            max: 32,
            actual: 33,
            ..
        })
    ));
    assert!(matches!(
        writer.put("salinity", &Values::Doubles(vec![35.0, 35.1])),
        Err(NcError::VariableNotFound { .. })
    ));
}

#[test]
fn patcher_rewrites_in_place() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("track.nc");
    let mut writer = NcWriter::create(&path, trajectory_definition(2)).unwrap();
    writer.put("flag", &Values::Chars(b"22".to_vec())).unwrap();
    writer.put("time", &Values::Doubles(vec![10.0, 20.0])).unwrap();
    writer.finish().unwrap();
    let size = std::fs::metadata(&path).unwrap().len();

    {
        let mut patcher = NcPatcher::open(&path).unwrap();
        assert_eq!(patcher.read("flag").unwrap(), Values::Chars(b"22".to_vec()));
        patcher.write("flag", &Values::Chars(b"42".to_vec())).unwrap();
        patcher.write_text_rows("expocode", &["49P120101010"]).unwrap();
        // A rejected write leaves the file untouched.
        assert!(patcher.write("flag", &Values::Chars(b"444".to_vec())).is_err());
        assert_eq!(patcher.read_text_rows("expocode").unwrap(), vec!["49P120101010"]);
    }

    assert_eq!(std::fs::metadata(&path).unwrap().len(), size);
    let file = NcFile::open(&path).unwrap();
    assert_eq!(file.read_chars("flag").unwrap(), b"42".to_vec());
    assert_eq!(file.read_doubles("time").unwrap(), vec![10.0, 20.0]);
}

#[test]
fn missing_files_are_reported_by_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.nc");
    match NcFile::open(&path) {
        Err(NcError::FileNotFound { path: reported }) => assert_eq!(reported, path),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(matches!(
        NcPatcher::open(&path),
        Err(NcError::FileNotFound { .. })
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn text_rows_survive_the_file(rows in proptest::collection::vec("[A-Za-z0-9 ._-]{0,32}", 1..6)) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rows.nc");
        let mut definition = NcDefinition::new();
        let obs = definition.add_dimension("obs", rows.len()).unwrap();
        let strlen = definition.add_dimension("string_length", 32).unwrap();
        definition.add_variable("label", NcType::Char, &[obs, strlen]).unwrap();

        let mut writer = NcWriter::create(&path, definition).unwrap();
        writer.put_text_rows("label", &rows).unwrap();
        writer.finish().unwrap();

        let read = NcFile::open(&path).unwrap().read_text_rows("label").unwrap();
        let expected: Vec<String> = rows.iter().map(|row| row.trim_end().to_string()).collect();
        prop_assert_eq!(read, expected);
    }
}
