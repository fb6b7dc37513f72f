use dsg_cli::listing::{type_rows, types_table};
use dsg_standards::load_builtin_registries;

#[test]
fn metadata_types() {
    let registries = load_builtin_registries().unwrap();
    let rows = type_rows(&registries.metadata);
    insta::assert_json_snapshot!(rows);
}

#[test]
fn table_lists_every_user_type() {
    let registries = load_builtin_registries().unwrap();
    let rows = type_rows(&registries.user);
    assert_eq!(rows.len(), registries.user.len());
    assert_eq!(rows[0].name, "unknown");

    assert_eq!(types_table(&rows).row_iter().count(), rows.len());
    let longitude = rows.iter().find(|row| row.name == "longitude").unwrap();
    assert!(longitude.critical);
    assert_eq!(longitude.units[0], "deg E");
}
