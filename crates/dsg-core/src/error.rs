use thiserror::Error;

/// Fatal problems building a standardization array.
///
/// Problems with individual values never end up here; they are recorded
/// as diagnostics on the array.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StandardizeError {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// A converter needs a column type the array does not have.
    #[error("column '{column}' requires a {required} column")]
    UnresolvableColumn { column: String, required: String },

    #[error("columns depend on each other: {}", columns.join(", "))]
    DependencyCycle { columns: Vec<String> },

    #[error("no data rows given")]
    NoData,
}

impl StandardizeError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StandardizeError>;
