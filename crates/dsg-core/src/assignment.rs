use dsg_model::DataType;
use dsg_standards::names;

/// How one user column is to be read: its type, the unit the values are
/// given in, and an optional extra missing-value string.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnAssignment {
    pub header: String,
    pub data_type: DataType,
    /// Empty means the canonical unit of the type.
    pub unit: String,
    pub missing: Option<String>,
}

impl ColumnAssignment {
    pub fn new(header: impl Into<String>, data_type: DataType) -> Self {
        Self {
            header: header.into(),
            data_type,
            unit: String::new(),
            missing: None,
        }
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    #[must_use]
    pub fn with_missing(mut self, missing: impl Into<String>) -> Self {
        self.missing = Some(missing.into());
        self
    }

    /// Unknown and other columns are never converted.
    pub fn is_ignored(&self) -> bool {
        is_ignored_type(&self.data_type)
    }
}

pub(crate) fn is_ignored_type(data_type: &DataType) -> bool {
    matches!(data_type.var_name(), names::UNKNOWN | names::OTHER)
}
