//! Error types for NetCDF file operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::NcType;

/// Errors that can occur when reading, writing or patching NetCDF files.
#[derive(Debug, Error)]
pub enum NcError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Malformed header or data section.
    #[error("invalid NetCDF file at offset {offset}: {message}")]
    InvalidFormat { offset: usize, message: String },

    /// A definition that cannot be written.
    #[error("invalid definition: {message}")]
    InvalidDefinition { message: String },

    /// A dimension or variable name used twice.
    #[error("duplicate name: {name}")]
    DuplicateName { name: String },

    #[error("no dimension named {name}")]
    DimensionNotFound { name: String },

    #[error("no variable named {name}")]
    VariableNotFound { name: String },

    #[error("variable {name} holds {actual} values, not {expected}")]
    TypeMismatch {
        name: String,
        expected: NcType,
        actual: NcType,
    },

    #[error("variable {name} has {actual} values where {expected} were expected")]
    ShapeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("a value of length {actual} does not fit variable {name} (max {max})")]
    StringTooLong {
        name: String,
        max: usize,
        actual: usize,
    },

    /// The classic format addresses data with signed 32-bit offsets.
    #[error("data section of {size} bytes is too large for the classic format")]
    TooLarge { size: u64 },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for NetCDF operations.
pub type Result<T> = std::result::Result<T, NcError>;

impl NcError {
    pub fn invalid_format(offset: usize, message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            offset,
            message: message.into(),
        }
    }

    pub fn invalid_definition(message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            message: message.into(),
        }
    }

    pub fn variable_not_found(name: impl Into<String>) -> Self {
        Self::VariableNotFound { name: name.into() }
    }

    /// Maps a `NotFound` I/O error on `path` to [`NcError::FileNotFound`].
    pub(crate) fn from_open(err: std::io::Error, path: &std::path::Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NcError::invalid_format(4, "bad magic");
        assert_eq!(err.to_string(), "invalid NetCDF file at offset 4: bad magic");

        let err = NcError::TypeMismatch {
            name: "time".to_string(),
            expected: NcType::Double,
            actual: NcType::Int,
        };
        assert_eq!(err.to_string(), "variable time holds int values, not double");
    }

    #[test]
    fn test_open_error_mapping() {
        let path = std::path::Path::new("missing.nc");
        let err = NcError::from_open(std::io::Error::from(std::io::ErrorKind::NotFound), path);
        assert!(matches!(err, NcError::FileNotFound { .. }));
        let err = NcError::from_open(std::io::Error::from(std::io::ErrorKind::PermissionDenied), path);
        assert!(matches!(err, NcError::Io(_)));
    }
}
