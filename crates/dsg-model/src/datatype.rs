//! Data type descriptors.
//!
//! A [`DataType`] describes one kind of column: its host kind, display
//! metadata, units, bound thresholds and the pipelines (roles) that may
//! use it. Data types are immutable once built.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use crate::diagnostic::{BoundsViolation, Diagnostic, Severity};
use crate::enums::{Role, category, units};
use crate::error::{ModelError, Result};
use crate::kind::{DataKind, DataValue};
use crate::missing::{
    CHAR_MISSING_VALUE, FP_MISSING_VALUE, INT_MISSING_VALUE, STRING_MISSING_VALUE, is_fp_missing,
};

/// Four-tier bound thresholds.
///
/// Values below `min_question` or above `max_question` are unreasonable;
/// values between a question and an accept threshold are questionable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bounds {
    pub min_question: Option<DataValue>,
    pub min_accept: Option<DataValue>,
    pub max_accept: Option<DataValue>,
    pub max_question: Option<DataValue>,
}

impl Bounds {
    pub fn new(
        min_question: Option<DataValue>,
        min_accept: Option<DataValue>,
        max_accept: Option<DataValue>,
        max_question: Option<DataValue>,
    ) -> Self {
        Self {
            min_question,
            min_accept,
            max_accept,
            max_question,
        }
    }

    /// The thresholds in ascending order.
    pub fn as_array(&self) -> [Option<&DataValue>; 4] {
        [
            self.min_question.as_ref(),
            self.min_accept.as_ref(),
            self.max_accept.as_ref(),
            self.max_question.as_ref(),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.as_array().iter().all(Option::is_none)
    }
}

/// Immutable descriptor of a data column type.
#[derive(Debug, Clone, PartialEq)]
pub struct DataType {
    var_name: String,
    kind: DataKind,
    sort_order: f64,
    display_name: String,
    description: Option<String>,
    is_critical: bool,
    units: Vec<String>,
    standard_name: Option<String>,
    category: Option<String>,
    file_std_unit: Option<String>,
    bounds: Bounds,
    roles: BTreeSet<Role>,
}

/// Normalized key used for alias matching: alphanumerics only, lowercase.
pub fn name_key(name: &str) -> String {
    name.chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

impl DataType {
    pub fn builder(var_name: impl Into<String>, kind: DataKind, sort_order: f64) -> DataTypeBuilder {
        DataTypeBuilder::new(var_name, kind, sort_order)
    }

    pub fn var_name(&self) -> &str {
        &self.var_name
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    pub fn sort_order(&self) -> f64 {
        self.sort_order
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_critical(&self) -> bool {
        self.is_critical
    }

    /// Unit strings; the first one is canonical.
    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn canonical_unit(&self) -> &str {
        self.units.first().map_or("", String::as_str)
    }

    pub fn standard_name(&self) -> Option<&str> {
        self.standard_name.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Unit written to files; defaults to the canonical unit.
    pub fn file_std_unit(&self) -> &str {
        self.file_std_unit
            .as_deref()
            .unwrap_or_else(|| self.canonical_unit())
    }

    /// The explicitly configured file unit, if any.
    pub fn explicit_file_std_unit(&self) -> Option<&str> {
        self.file_std_unit.as_deref()
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns true if the given name is an alias of this type.
    pub fn name_matches(&self, name: &str) -> bool {
        let key = name_key(name);
        !key.is_empty() && (key == name_key(&self.var_name) || key == name_key(&self.display_name))
    }

    /// Returns true if any alias of `other` is an alias of this type.
    pub fn type_name_equals(&self, other: &DataType) -> bool {
        self.name_matches(&other.var_name) || self.name_matches(&other.display_name)
    }

    /// Quality-flag type: a character in the Quality category named
    /// `QC`/`WOCE` or with a `QC_`/`WOCE_` prefix or `_QC`/`_WOCE` suffix.
    pub fn is_qc_type(&self) -> bool {
        if self.kind != DataKind::Character || self.category() != Some(category::QUALITY) {
            return false;
        }
        let upper = self.var_name.to_uppercase();
        upper == "QC"
            || upper == "WOCE"
            || upper.starts_with("QC_")
            || upper.starts_with("WOCE_")
            || upper.ends_with("_QC")
            || upper.ends_with("_WOCE")
    }

    /// Comment type: a string whose name contains `COMMENT`.
    pub fn is_comment_type(&self) -> bool {
        self.kind == DataKind::String && self.var_name.to_uppercase().contains("COMMENT")
    }

    /// Returns true if the canonical unit is the epoch-seconds time unit.
    pub fn is_time_like(&self) -> bool {
        self.kind == DataKind::Double && self.canonical_unit() == units::TIME_UNITS[0]
    }

    /// Serialization sentinel for this type.
    pub fn missing_value(&self) -> DataValue {
        match self.kind {
            DataKind::String => DataValue::String(STRING_MISSING_VALUE.to_string()),
            DataKind::Integer => DataValue::Int(INT_MISSING_VALUE),
            DataKind::Double => DataValue::Double(FP_MISSING_VALUE),
            DataKind::Character => DataValue::Char(CHAR_MISSING_VALUE),
        }
    }

    /// Returns true if the value is this type's sentinel (or not usable).
    pub fn is_missing_value(&self, value: &DataValue) -> bool {
        match value {
            DataValue::String(text) => text.trim().is_empty(),
            DataValue::Int(number) => *number == INT_MISSING_VALUE,
            DataValue::Double(number) => is_fp_missing(*number),
            DataValue::Char(ch) => *ch == CHAR_MISSING_VALUE || *ch == '\0',
        }
    }

    /// Checks that a value has this type's host kind.
    pub fn check_kind(&self, value: &DataValue) -> Result<()> {
        if value.kind() == self.kind {
            Ok(())
        } else {
            Err(ModelError::value(format!(
                "{} expects a {} value but got {} ({value})",
                self.var_name,
                self.kind,
                value.kind()
            )))
        }
    }

    /// Bounds check a standardized value.
    ///
    /// Returns `None` for a null value or a value inside the acceptable
    /// range. Unreasonable values are CRITICAL for critical or integer
    /// types and ERROR otherwise; questionable values are WARNING.
    pub fn bounds_check(&self, value: Option<&DataValue>) -> Option<Diagnostic> {
        let value = value?;
        let violation = self.bounds_violation(value)?;
        let (limit, relation, kind) = match violation {
            BoundsViolation::UnreasonablySmall => {
                (self.bounds.min_question.as_ref(), "less", "reasonable")
            }
            BoundsViolation::QuestionablySmall => {
                (self.bounds.min_accept.as_ref(), "less", "acceptable")
            }
            BoundsViolation::QuestionablyLarge => {
                (self.bounds.max_accept.as_ref(), "more", "acceptable")
            }
            BoundsViolation::UnreasonablyLarge => {
                (self.bounds.max_question.as_ref(), "more", "reasonable")
            }
        };
        let limit = limit.map(ToString::to_string).unwrap_or_default();
        let severity = if !violation.is_unreasonable() {
            Severity::Warning
        } else if self.is_critical || self.kind == DataKind::Integer {
            Severity::Critical
        } else {
            Severity::Error
        };
        let general = format!(
            "{} is {relation} than the {kind} limit of {limit}",
            self.display_name
        );
        let detailed = format!(
            "{} value of {value} is {relation} than the {kind} limit of {limit}",
            self.display_name
        );
        Some(
            Diagnostic::new(severity, general)
                .with_detail(detailed)
                .with_violation(violation),
        )
    }

    /// Classify a value against the thresholds without building a message.
    pub fn bounds_violation(&self, value: &DataValue) -> Option<BoundsViolation> {
        let below = |limit: &Option<DataValue>| {
            limit
                .as_ref()
                .and_then(|limit| value.compare(limit))
                .is_some_and(|ord| ord == Ordering::Less)
        };
        let above = |limit: &Option<DataValue>| {
            limit
                .as_ref()
                .and_then(|limit| value.compare(limit))
                .is_some_and(|ord| ord == Ordering::Greater)
        };
        if below(&self.bounds.min_question) {
            Some(BoundsViolation::UnreasonablySmall)
        } else if above(&self.bounds.max_question) {
            Some(BoundsViolation::UnreasonablyLarge)
        } else if below(&self.bounds.min_accept) {
            Some(BoundsViolation::QuestionablySmall)
        } else if above(&self.bounds.max_accept) {
            Some(BoundsViolation::QuestionablyLarge)
        } else {
            None
        }
    }

    /// Deterministic enumeration order: sort order, display name, kind, name.
    pub fn sort_cmp(&self, other: &DataType) -> Ordering {
        self.sort_order
            .total_cmp(&other.sort_order)
            .then_with(|| self.display_name.cmp(&other.display_name))
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.var_name.cmp(&other.var_name))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.var_name, self.kind)
    }
}

/// Builder for [`DataType`]; `build` validates the definition.
#[derive(Debug, Clone)]
pub struct DataTypeBuilder {
    inner: DataType,
}

impl DataTypeBuilder {
    fn new(var_name: impl Into<String>, kind: DataKind, sort_order: f64) -> Self {
        let var_name = var_name.into();
        Self {
            inner: DataType {
                display_name: var_name.clone(),
                var_name,
                kind,
                sort_order,
                description: None,
                is_critical: false,
                units: units::NO_UNITS.iter().map(ToString::to_string).collect(),
                standard_name: None,
                category: None,
                file_std_unit: None,
                bounds: Bounds::default(),
                roles: BTreeSet::new(),
            },
        }
    }

    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.inner.display_name = name.into();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.inner.description = non_empty(description.into());
        self
    }

    #[must_use]
    pub fn critical(mut self, critical: bool) -> Self {
        self.inner.is_critical = critical;
        self
    }

    #[must_use]
    pub fn units<S: AsRef<str>>(mut self, units: &[S]) -> Self {
        self.inner.units = units.iter().map(|unit| unit.as_ref().to_string()).collect();
        self
    }

    #[must_use]
    pub fn standard_name(mut self, name: impl Into<String>) -> Self {
        self.inner.standard_name = non_empty(name.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.inner.category = non_empty(category.into());
        self
    }

    #[must_use]
    pub fn file_std_unit(mut self, unit: impl Into<String>) -> Self {
        self.inner.file_std_unit = non_empty(unit.into());
        self
    }

    #[must_use]
    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.inner.bounds = bounds;
        self
    }

    /// Numeric thresholds, converted to the builder's kind at build time.
    #[must_use]
    pub fn numeric_bounds(
        self,
        min_question: Option<f64>,
        min_accept: Option<f64>,
        max_accept: Option<f64>,
        max_question: Option<f64>,
    ) -> Self {
        let kind = self.inner.kind;
        let convert = |value: Option<f64>| {
            value.map(|number| match kind {
                DataKind::Integer => DataValue::Int(number as i32),
                _ => DataValue::Double(number),
            })
        };
        self.bounds(Bounds::new(
            convert(min_question),
            convert(min_accept),
            convert(max_accept),
            convert(max_question),
        ))
    }

    #[must_use]
    pub fn roles(mut self, roles: &[Role]) -> Self {
        self.inner.roles = roles.iter().copied().collect();
        self
    }

    pub fn build(self) -> Result<DataType> {
        let data_type = self.inner;
        let name = &data_type.var_name;
        if name.trim().is_empty() || name.chars().any(char::is_whitespace) {
            return Err(ModelError::configuration(format!(
                "invalid data type name '{name}'"
            )));
        }
        if !data_type.sort_order.is_finite() {
            return Err(ModelError::configuration(format!(
                "sort order of {name} must be finite"
            )));
        }
        if data_type.display_name.trim().is_empty() {
            return Err(ModelError::configuration(format!(
                "display name of {name} is blank"
            )));
        }
        if data_type.units.is_empty() {
            return Err(ModelError::configuration(format!(
                "{name} must have at least one unit (use \"\" for none)"
            )));
        }
        validate_bounds(name, data_type.kind, &data_type.bounds)?;
        Ok(data_type)
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

/// Thresholds must match the kind and strictly increase where given.
fn validate_bounds(name: &str, kind: DataKind, bounds: &Bounds) -> Result<()> {
    let present: Vec<&DataValue> = bounds.as_array().into_iter().flatten().collect();
    for limit in &present {
        if limit.kind() != kind {
            return Err(ModelError::configuration(format!(
                "bound {limit} of {name} is not a {kind} value"
            )));
        }
        if let DataValue::Double(number) = limit
            && !number.is_finite()
        {
            return Err(ModelError::configuration(format!(
                "bound of {name} must be finite"
            )));
        }
    }
    for pair in present.windows(2) {
        if pair[0].compare(pair[1]) != Some(Ordering::Less) {
            return Err(ModelError::configuration(format!(
                "bounds of {name} are not in increasing order ({} >= {})",
                pair[0], pair[1]
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salinity() -> DataType {
        DataType::builder("sal", DataKind::Double, 600.0)
            .display_name("salinity")
            .units(&["PSU"])
            .numeric_bounds(Some(-0.1), Some(0.0), Some(42.0), Some(50.0))
            .roles(&[Role::UserData, Role::FileData])
            .build()
            .unwrap()
    }

    #[test]
    fn defaults() {
        let dtype = DataType::builder("investigators", DataKind::String, 103.0)
            .build()
            .unwrap();
        assert_eq!(dtype.display_name(), "investigators");
        assert_eq!(dtype.units(), &["".to_string()]);
        assert_eq!(dtype.file_std_unit(), "");
        assert!(dtype.bounds().is_empty());
    }

    #[test]
    fn rejects_bad_definitions() {
        assert!(
            DataType::builder("bad name", DataKind::Double, 1.0)
                .build()
                .is_err()
        );
        assert!(
            DataType::builder("x", DataKind::Double, f64::NAN)
                .build()
                .is_err()
        );
        let err = DataType::builder("x", DataKind::Double, 1.0)
            .numeric_bounds(Some(10.0), None, None, Some(5.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidConfiguration(_)));
        let err = DataType::builder("x", DataKind::Double, 1.0)
            .bounds(Bounds::new(Some(DataValue::Int(1)), None, None, None))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("not a Double"));
    }

    #[test]
    fn alias_matching() {
        let dtype = salinity();
        assert!(dtype.name_matches("SAL"));
        assert!(dtype.name_matches("Salinity"));
        assert!(dtype.name_matches("sali_nity"));
        assert!(!dtype.name_matches("salt"));
        assert!(!dtype.name_matches("__"));
    }

    #[test]
    fn bounds_tiers() {
        let dtype = salinity();
        let check = |v: f64| dtype.bounds_check(Some(&DataValue::Double(v)));
        assert_eq!(check(-1.0).unwrap().severity, Severity::Error);
        assert_eq!(
            check(-1.0).unwrap().violation,
            Some(BoundsViolation::UnreasonablySmall)
        );
        assert_eq!(check(-0.05).unwrap().severity, Severity::Warning);
        assert!(check(0.0).is_none());
        assert!(check(35.0).is_none());
        assert!(check(42.0).is_none());
        assert_eq!(
            check(45.0).unwrap().violation,
            Some(BoundsViolation::QuestionablyLarge)
        );
        let msg = check(51.0).unwrap();
        assert_eq!(msg.general, "salinity is more than the reasonable limit of 50");
        assert_eq!(
            msg.detailed,
            "salinity value of 51 is more than the reasonable limit of 50"
        );
        assert!(dtype.bounds_check(None).is_none());
    }

    #[test]
    fn integer_bounds_escalate() {
        let month = DataType::builder("month", DataKind::Integer, 313.0)
            .numeric_bounds(Some(1.0), None, None, Some(12.0))
            .build()
            .unwrap();
        let msg = month.bounds_check(Some(&DataValue::Int(13))).unwrap();
        assert_eq!(msg.severity, Severity::Critical);
    }

    #[test]
    fn qc_and_comment_types() {
        let woce = DataType::builder("WOCE_CO2_water", DataKind::Character, 650.0)
            .category(category::QUALITY)
            .build()
            .unwrap();
        assert!(woce.is_qc_type());
        let comment = DataType::builder("comment_WOCE_CO2_water", DataKind::String, 651.0)
            .build()
            .unwrap();
        assert!(comment.is_comment_type());
        assert!(!comment.is_qc_type());
    }

    #[test]
    fn ordering_uses_sort_order_first() {
        let a = DataType::builder("b", DataKind::Double, 1.0).build().unwrap();
        let b = DataType::builder("a", DataKind::Double, 2.0).build().unwrap();
        assert_eq!(a.sort_cmp(&b), Ordering::Less);
    }

    #[test]
    fn missing_values_by_kind() {
        let dtype = salinity();
        assert_eq!(dtype.missing_value(), DataValue::Double(FP_MISSING_VALUE));
        assert!(dtype.is_missing_value(&DataValue::Double(FP_MISSING_VALUE)));
        assert!(dtype.check_kind(&DataValue::Int(3)).is_err());
    }
}
