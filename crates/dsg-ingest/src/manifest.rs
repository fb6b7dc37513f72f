//! Submission manifests.
//!
//! ```toml
//! [dataset]
//! expocode = "33RO20100105"
//! dataset_name = "RB1001"
//! platform_name = "Ronald H. Brown"
//!
//! [input]
//! path = "underway.tsv"
//!
//! [[columns]]
//! header = "SST"
//! type = "temp"
//! unit = "degrees C"
//!
//! [checks]
//! speed_warning_knots = 25.0
//! ```
//!
//! Relative paths are relative to the directory of the manifest.

use std::path::{Path, PathBuf};

use dsg_core::{
    DEFAULT_SPEED_ERROR_KNOTS, DEFAULT_SPEED_WARNING_KNOTS, MetadataRecord, StandardizeOptions,
};
use dsg_standards::{Registries, load_builtin_registries, load_registries_from_file};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::table::TableFormat;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub dataset: DatasetSection,
    pub input: InputSection,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub types: TypesSection,
    #[serde(default)]
    pub checks: ChecksSection,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// Dataset-level metadata given by the submitter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetSection {
    pub expocode: Option<String>,
    pub dataset_name: Option<String>,
    pub platform_name: Option<String>,
    pub platform_type: Option<String>,
    pub organization: Option<String>,
    pub investigators: Option<String>,
    pub version: Option<String>,
    pub qc_flag: Option<String>,
    pub doi: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSection {
    pub path: PathBuf,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Lines starting with this character are skipped; empty for none.
    #[serde(default = "default_comment")]
    pub comment: String,
}

fn default_delimiter() -> char {
    '\t'
}

fn default_comment() -> String {
    "#".to_string()
}

/// An explicit assignment of a data file column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnSpec {
    pub header: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub unit: Option<String>,
    pub missing: Option<String>,
}

/// An external type catalog replacing the builtin one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypesSection {
    pub catalog: Option<PathBuf>,
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChecksSection {
    pub speed_warning_knots: f64,
    pub speed_error_knots: f64,
}

impl Default for ChecksSection {
    fn default() -> Self {
        Self {
            speed_warning_knots: DEFAULT_SPEED_WARNING_KNOTS,
            speed_error_knots: DEFAULT_SPEED_ERROR_KNOTS,
        }
    }
}

type Setter = fn(&mut MetadataRecord, Option<&str>) -> dsg_model::Result<()>;

/// Reads and checks a manifest file.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let contents = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let mut manifest: Manifest = toml::from_str(&contents).map_err(|e| IngestError::Toml {
        path: path.to_path_buf(),
        source: e,
    })?;
    manifest.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    manifest.validate()?;
    debug!(
        path = %path.display(),
        columns = manifest.columns.len(),
        "loaded manifest"
    );
    Ok(manifest)
}

impl Manifest {
    pub fn validate(&self) -> Result<()> {
        if !self.input.delimiter.is_ascii() {
            return Err(IngestError::manifest(format!(
                "delimiter '{}' is not a single byte",
                self.input.delimiter
            )));
        }
        if self.input.comment.len() > 1 {
            return Err(IngestError::manifest(format!(
                "comment prefix '{}' is not a single byte",
                self.input.comment
            )));
        }
        let checks = &self.checks;
        if !(checks.speed_warning_knots > 0.0
            && checks.speed_warning_knots <= checks.speed_error_knots)
        {
            return Err(IngestError::manifest(format!(
                "speed limits must satisfy 0 < warning ({}) <= error ({})",
                checks.speed_warning_knots, checks.speed_error_knots
            )));
        }
        for (index, column) in self.columns.iter().enumerate() {
            if column.header.trim().is_empty() {
                return Err(IngestError::manifest(format!("column {} has no header", index + 1)));
            }
            let duplicate = self.columns[..index]
                .iter()
                .any(|other| other.header.trim().eq_ignore_ascii_case(column.header.trim()));
            if duplicate {
                return Err(IngestError::manifest(format!(
                    "column '{}' is assigned more than once",
                    column.header
                )));
            }
        }
        Ok(())
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn data_path(&self) -> PathBuf {
        self.resolve(&self.input.path)
    }

    pub fn table_format(&self) -> TableFormat {
        // Both are checked to be single ASCII bytes.
        TableFormat {
            delimiter: u8::try_from(self.input.delimiter).unwrap_or(b'\t'),
            comment: self.input.comment.bytes().next(),
        }
    }

    /// The builtin registries, or those of the configured catalog.
    pub fn registries(&self) -> Result<Registries> {
        match &self.types.catalog {
            Some(catalog) => Ok(load_registries_from_file(
                &self.resolve(catalog),
                self.types.sha256.as_deref(),
            )?),
            None => Ok(load_builtin_registries()?),
        }
    }

    pub fn options(&self) -> StandardizeOptions {
        StandardizeOptions::default()
            .with_speed_limits(self.checks.speed_warning_knots, self.checks.speed_error_knots)
    }

    /// Copies the given dataset values into a metadata record.
    pub fn apply_dataset(&self, record: &mut MetadataRecord) -> Result<()> {
        let dataset = &self.dataset;
        if dataset.expocode.is_some() {
            record.set_dataset_id(dataset.expocode.as_deref())?;
        }
        let fields: [(&Option<String>, Setter); 8] = [
            (&dataset.dataset_name, MetadataRecord::set_dataset_name),
            (&dataset.platform_name, MetadataRecord::set_platform_name),
            (&dataset.platform_type, MetadataRecord::set_platform_type),
            (&dataset.organization, MetadataRecord::set_organization),
            (&dataset.investigators, MetadataRecord::set_investigators),
            (&dataset.version, MetadataRecord::set_version),
            (&dataset.qc_flag, MetadataRecord::set_qc_flag),
            (&dataset.doi, MetadataRecord::set_doi),
        ];
        for (value, set) in fields {
            if let Some(value) = value {
                set(record, Some(value))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_manifest_uses_defaults() {
        let manifest: Manifest = toml::from_str("[input]\npath = \"data.tsv\"\n").unwrap();
        assert_eq!(manifest.table_format(), TableFormat::default());
        assert_eq!(manifest.checks, ChecksSection::default());
        assert!(manifest.columns.is_empty());
        manifest.validate().unwrap();
    }

    #[test]
    fn bad_settings_are_rejected() {
        let manifest: Manifest = toml::from_str(
            "[input]\npath = \"data.csv\"\ndelimiter = \",\"\ncomment = \"\"\n\n[checks]\nspeed_warning_knots = 60.0\n",
        )
        .unwrap();
        assert_eq!(
            manifest.table_format(),
            TableFormat {
                delimiter: b',',
                comment: None
            }
        );
        assert!(matches!(
            manifest.validate(),
            Err(IngestError::InvalidManifest { .. })
        ));

        let unknown = toml::from_str::<Manifest>("[input]\npath = \"a\"\nencoding = \"latin1\"\n");
        assert!(unknown.is_err());
    }
}
