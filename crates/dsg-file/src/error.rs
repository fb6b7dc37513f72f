//! Error types for DSG file operations.

use std::path::{Path, PathBuf};

use dsg_core::StandardizeError;
use dsg_model::ModelError;
use dsg_nc::NcError;
use thiserror::Error;

/// Errors that can occur when creating, reading or updating a DSG file.
///
/// Every variant names the file; problems with a single variable also
/// name the variable.
#[derive(Debug, Error)]
pub enum DsgFileError {
    /// The file does not have the layout of a DSG trajectory file.
    #[error("{}: {message}", path.display())]
    FileFormat { path: PathBuf, message: String },

    #[error("{}: no variable named {name}", path.display())]
    VariableNotFound { path: PathBuf, name: String },

    #[error("{}: variable {name} has {actual} values where {expected} were expected", path.display())]
    ShapeMismatch {
        path: PathBuf,
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("{}: a value of length {actual} does not fit variable {name} (max {max})", path.display())]
    StringTooLong {
        path: PathBuf,
        name: String,
        max: usize,
        actual: usize,
    },

    /// Any other failure of the underlying NetCDF file.
    #[error("{}: {source}", path.display())]
    Nc {
        path: PathBuf,
        #[source]
        source: NcError,
    },

    #[error(transparent)]
    Standardize(#[from] StandardizeError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type alias for DSG file operations.
pub type Result<T> = std::result::Result<T, DsgFileError>;

impl DsgFileError {
    pub fn file_format(path: &Path, message: impl Into<String>) -> Self {
        Self::FileFormat {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn variable_not_found(path: &Path, name: impl Into<String>) -> Self {
        Self::VariableNotFound {
            path: path.to_path_buf(),
            name: name.into(),
        }
    }

    /// Attaches the file path, keeping the variable-level variants typed.
    pub fn from_nc(path: &Path, err: NcError) -> Self {
        let path = path.to_path_buf();
        match err {
            NcError::VariableNotFound { name } => Self::VariableNotFound { path, name },
            NcError::ShapeMismatch {
                name,
                expected,
                actual,
            } => Self::ShapeMismatch {
                path,
                name,
                expected,
                actual,
            },
            NcError::StringTooLong { name, max, actual } => Self::StringTooLong {
                path,
                name,
                max,
                actual,
            },
            source => Self::Nc { path, source },
        }
    }
}

pub(crate) trait AtPath<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> AtPath<T> for std::result::Result<T, NcError> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|err| DsgFileError::from_nc(path, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_errors_keep_their_names() {
        let path = Path::new("/data/33RO20100105.nc");
        let err = DsgFileError::from_nc(
            path,
            NcError::ShapeMismatch {
                name: "temp".to_string(),
                expected: 26,
                actual: 25,
            },
        );
        assert_eq!(
            err.to_string(),
            "/data/33RO20100105.nc: variable temp has 25 values where 26 were expected"
        );

        let err = DsgFileError::from_nc(path, NcError::invalid_format(0, "not a NetCDF file"));
        assert!(matches!(err, DsgFileError::Nc { .. }));
        assert!(err.to_string().starts_with("/data/33RO20100105.nc: invalid NetCDF file"));
    }
}
