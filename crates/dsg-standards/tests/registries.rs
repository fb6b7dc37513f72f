use std::fs;

use dsg_model::{DataKind, DataType, Role};
use dsg_standards::hash::sha256_hex;
use dsg_standards::{
    BUILTIN_CATALOG, StandardsError, load_builtin_registries, load_registries_from_file, names,
};

fn names_of(registry: &dsg_standards::TypeRegistry) -> Vec<&str> {
    registry.iter().map(DataType::var_name).collect()
}

#[test]
fn metadata_registry_names() {
    let registries = load_builtin_registries().expect("load builtin registries");
    insta::assert_json_snapshot!(names_of(&registries.metadata));
}

#[test]
fn registries_are_selected_by_role() {
    let registries = load_builtin_registries().expect("load builtin registries");
    for data_type in &registries.user {
        assert!(data_type.has_role(Role::UserData), "{data_type}");
    }
    for data_type in &registries.data {
        assert!(data_type.has_role(Role::FileData), "{data_type}");
    }
    assert!(registries.user.get(names::UNKNOWN).is_some());
    assert!(registries.user.get(names::SAMPLE_NUMBER).is_none());
    assert!(registries.user.get(names::WOCE_AUTOCHECK).is_none());
    assert!(registries.data.get(names::SAMPLE_NUMBER).is_some());
    assert!(registries.data.get(names::REGION_ID).is_some());
    assert!(registries.data.get(names::DATE_TIME).is_none());
    assert!(registries.metadata.get(names::EXPOCODE).is_some());
    assert_eq!(registries.data.len(), 35);
}

#[test]
fn builtin_types_match_catalog_constants() {
    let registries = load_builtin_registries().expect("load builtin registries");
    let lon = registries.data.get(names::LONGITUDE).unwrap();
    assert_eq!(lon.kind(), DataKind::Double);
    assert_eq!(lon.canonical_unit(), "deg E");
    assert_eq!(lon.file_std_unit(), "degrees_east");
    assert!(lon.is_critical());

    let year = registries.user.get(names::YEAR).unwrap();
    assert_eq!(year.kind(), DataKind::Integer);
    assert!(year.is_critical());

    let time = registries.data.get(names::TIME).unwrap();
    assert!(time.is_time_like());

    let comment = registries.user.get("comment_WOCE_CO2_water").unwrap();
    assert!(comment.is_comment_type());
    let woce = registries.user.get(names::WOCE_CO2_WATER).unwrap();
    assert!(woce.is_qc_type());
}

#[test]
fn user_lookup_by_alias() {
    let registries = load_builtin_registries().expect("load builtin registries");
    let user = &registries.user;
    assert_eq!(user.lookup("SST").map(DataType::var_name), None);
    assert_eq!(
        user.lookup("Sea Surface Temperature").map(DataType::var_name),
        Some("temp")
    );
    assert_eq!(user.lookup("LATITUDE").map(DataType::var_name), Some("latitude"));
    assert_eq!(user.lookup("Date/Time").map(DataType::var_name), Some("date_time"));
    assert_eq!(
        user.lookup("xCO2 water equi temp dry ppm").map(DataType::var_name),
        Some("xCO2_water_equi_temp_dry_ppm")
    );
}

#[test]
fn external_catalog_with_sha_pin() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("types.properties");
    fs::write(&path, BUILTIN_CATALOG).expect("write catalog");
    let pin = sha256_hex(BUILTIN_CATALOG.as_bytes());

    let loaded = load_registries_from_file(&path, Some(&pin.to_uppercase())).expect("load pinned");
    assert_eq!(loaded, load_builtin_registries().unwrap());

    let wrong = "0".repeat(64);
    let err = load_registries_from_file(&path, Some(&wrong)).unwrap_err();
    assert!(matches!(err, StandardsError::Sha256Mismatch { .. }));

    let err = load_registries_from_file(&path, Some("abc")).unwrap_err();
    assert!(matches!(err, StandardsError::InvalidSha256 { .. }));

    let err = load_registries_from_file(&dir.path().join("missing"), None).unwrap_err();
    assert!(matches!(err, StandardsError::Io { .. }));
}

#[test]
fn catalog_conflicts_are_reported_with_line() {
    let text = "sal = Double|600|salinity||false|1|PSU|||||||\n\
                salinity = Double|601|other||false|1|PSU|||||||\n";
    let err = dsg_standards::parse_catalog(text).unwrap_err();
    assert!(matches!(err, StandardsError::InvalidConfiguration { .. }));

    let text = "sal = Double|600|salinity||false|1|PSU||||50|||0\n";
    let err = dsg_standards::parse_catalog(text).unwrap_err();
    match err {
        StandardsError::PropertySyntax { line, message } => {
            assert_eq!(line, 1);
            assert!(message.contains("increasing order"), "{message}");
        }
        other => panic!("unexpected error {other}"),
    }
}
