use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// A data type definition is internally inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A value does not fit the data type it is assigned to.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl ModelError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    pub fn value(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
