use dsg_file::DsgFileError;
use thiserror::Error;

/// Errors that can occur when preparing or searching crossover series.
#[derive(Debug, Error)]
pub enum CrossoverError {
    #[error("dataset {dataset}: {name} has {actual} values where {expected} were expected")]
    LengthMismatch {
        dataset: String,
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("dataset {dataset}: no valid {name} values")]
    NoValidValues { dataset: String, name: &'static str },

    #[error("dataset id '{dataset}' is too short to name a platform")]
    InvalidDatasetId { dataset: String },

    #[error(transparent)]
    File(#[from] DsgFileError),
}

/// Result type alias for crossover operations.
pub type Result<T> = std::result::Result<T, CrossoverError>;
