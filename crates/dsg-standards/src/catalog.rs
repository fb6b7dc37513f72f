#![deny(unsafe_code)]

use std::path::Path;

use dsg_model::{DataType, Role};
use tracing::debug;

use crate::codec::{from_property_value, to_property_value};
use crate::error::StandardsError;
use crate::hash::{is_sha256_hex, sha256_hex};
use crate::properties::{parse_properties, write_properties};
use crate::registry::{TypeRegistry, TypeRegistryBuilder};

/// The builtin type catalog.
pub const BUILTIN_CATALOG: &str = include_str!("../data/socat_types.properties");

/// The three registries used by the pipelines.
#[derive(Debug, Clone, PartialEq)]
pub struct Registries {
    /// Columns a contributor may assign in an upload.
    pub user: TypeRegistry,
    /// Per-dataset variables of a DSG file.
    pub metadata: TypeRegistry,
    /// Per-sample variables of a DSG file.
    pub data: TypeRegistry,
}

impl Registries {
    pub fn from_catalog(catalog: &TypeRegistry) -> Result<Self, StandardsError> {
        Ok(Self {
            user: TypeRegistry::with_role(catalog, Role::UserData)?,
            metadata: TypeRegistry::with_role(catalog, Role::FileMetadata)?,
            data: TypeRegistry::with_role(catalog, Role::FileData)?,
        })
    }
}

/// Parses a catalog property file into a registry of every type it defines.
pub fn parse_catalog(text: &str) -> Result<TypeRegistry, StandardsError> {
    let mut builder = TypeRegistryBuilder::new();
    for property in parse_properties(text)? {
        let data_type = from_property_value(&property.name, &property.value).map_err(|err| {
            StandardsError::PropertySyntax {
                line: property.line,
                message: err.to_string(),
            }
        })?;
        builder.register(data_type)?;
    }
    let catalog = builder.build();
    debug!(types = catalog.len(), "parsed data type catalog");
    Ok(catalog)
}

/// Serializes types as a catalog property file.
pub fn write_catalog<'a>(types: impl IntoIterator<Item = &'a DataType>) -> String {
    write_properties(
        types
            .into_iter()
            .map(|data_type| (data_type.var_name(), to_property_value(data_type))),
    )
}

pub fn load_builtin_catalog() -> Result<TypeRegistry, StandardsError> {
    parse_catalog(BUILTIN_CATALOG)
}

pub fn load_builtin_registries() -> Result<Registries, StandardsError> {
    Registries::from_catalog(&load_builtin_catalog()?)
}

/// Loads a catalog file, verifying its sha256 digest first when a pin is given.
pub fn load_catalog_from_file(
    path: &Path,
    expected_sha256: Option<&str>,
) -> Result<TypeRegistry, StandardsError> {
    let bytes = std::fs::read(path).map_err(|e| StandardsError::io(path, e))?;
    if let Some(expected) = expected_sha256 {
        if !is_sha256_hex(expected) {
            return Err(StandardsError::InvalidSha256 {
                path: path.to_path_buf(),
                message: "sha256 must be 64 hex characters".to_string(),
            });
        }
        let expected = expected.to_ascii_lowercase();
        let actual = sha256_hex(&bytes);
        if actual != expected {
            return Err(StandardsError::Sha256Mismatch {
                path: path.to_path_buf(),
                expected,
                actual,
            });
        }
    }
    let text = String::from_utf8(bytes).map_err(|e| {
        StandardsError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        )
    })?;
    parse_catalog(&text)
}

pub fn load_registries_from_file(
    path: &Path,
    expected_sha256: Option<&str>,
) -> Result<Registries, StandardsError> {
    Registries::from_catalog(&load_catalog_from_file(path, expected_sha256)?)
}
