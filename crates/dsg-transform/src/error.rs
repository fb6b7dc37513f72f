use thiserror::Error;

/// Conversion failures.
///
/// [`ConvertError::InvalidValue`] concerns a single cell and is recorded as a
/// diagnostic by the caller. The other variants mean the column assignment
/// itself cannot work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The raw text is not missing and cannot be interpreted.
    #[error("{0}")]
    InvalidValue(String),

    /// No conversion is known between the two units.
    #[error("no conversion from '{from}' to '{to}'")]
    UnknownConversion { from: String, to: String },

    /// The unit is not one of the units of the data type.
    #[error("unit '{unit}' is not supported for {name}")]
    UnsupportedUnit { unit: String, name: String },
}

impl ConvertError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }

    /// Returns true for errors in the column assignment rather than the data.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::InvalidValue(_))
    }
}
