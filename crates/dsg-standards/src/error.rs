#![deny(unsafe_code)]

use std::path::PathBuf;

use dsg_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("data type {name} is already registered with a different definition")]
    DuplicateType { name: String },

    #[error("line {line}: {message}")]
    PropertySyntax { line: usize, message: String },

    #[error("invalid definition of data type {name}: {message}")]
    InvalidProperty { name: String, message: String },

    #[error("invalid sha256 for {path}: {message}")]
    InvalidSha256 { path: PathBuf, message: String },

    #[error("sha256 mismatch for {path} (expected {expected}, got {actual})")]
    Sha256Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub(crate) fn property(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidProperty {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

impl From<ModelError> for StandardsError {
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::InvalidConfiguration(message) | ModelError::InvalidValue(message) => {
                Self::InvalidConfiguration { message }
            }
        }
    }
}
