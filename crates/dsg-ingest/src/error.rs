//! Error types for ingestion.

use std::path::PathBuf;

use dsg_core::StandardizeError;
use dsg_model::ModelError;
use dsg_standards::StandardsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML manifest {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse data file {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("data file {path} has no header row")]
    NoHeader { path: PathBuf },

    #[error("invalid manifest: {message}")]
    InvalidManifest { message: String },

    /// A declared column names a type the registry does not know.
    #[error("column '{column}': unknown data type {name}")]
    UnknownType { column: String, name: String },

    #[error(transparent)]
    Standardize(#[from] StandardizeError),

    #[error(transparent)]
    Standards(#[from] StandardsError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, IngestError>;

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn manifest(message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            message: message.into(),
        }
    }
}
