//! Recognition of missing-value text.

use dsg_model::{MAX_ABSOLUTE_ERROR, MAX_RELATIVE_ERROR, close_to};

/// Numeric sentinels always read as missing.
const NUMERIC_SENTINELS: [f64; 3] = [-999.0, -9999.0, -1.0E+34];

/// Additional sentinel for integer columns.
const INT_SENTINEL: f64 = -99.0;

/// Missing-value vocabulary for one column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissingValues {
    declared: Option<String>,
    declared_number: Option<f64>,
}

impl MissingValues {
    /// Vocabulary with an optional caller-declared missing string.
    pub fn new(declared: Option<&str>) -> Self {
        let declared = declared
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(ToString::to_string);
        let declared_number = declared
            .as_deref()
            .and_then(|text| text.parse::<f64>().ok())
            .filter(|number| number.is_finite());
        Self {
            declared,
            declared_number,
        }
    }

    pub fn declared(&self) -> Option<&str> {
        self.declared.as_deref()
    }

    /// Missing for any column kind: blank, dashes, NaN, N/A, NA or the
    /// declared string.
    pub fn is_missing_text(&self, raw: &str) -> bool {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().all(|ch| ch == '-') {
            return true;
        }
        if ["nan", "n/a", "na"]
            .iter()
            .any(|word| trimmed.eq_ignore_ascii_case(word))
        {
            return true;
        }
        self.declared.as_deref() == Some(trimmed)
    }

    /// Missing for a parsed numeric value.
    pub fn is_missing_number(&self, value: f64, integer: bool) -> bool {
        let close = |target: f64| close_to(value, target, MAX_RELATIVE_ERROR, MAX_ABSOLUTE_ERROR);
        NUMERIC_SENTINELS.into_iter().any(close)
            || (integer && close(INT_SENTINEL))
            || self.declared_number.is_some_and(close)
    }
}
