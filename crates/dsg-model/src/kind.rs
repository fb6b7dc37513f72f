//! Host value kinds for data columns.
//!
//! Every data type stores its standardized values as exactly one of four
//! host kinds. Call sites match on [`DataKind`] / [`DataValue`] exhaustively,
//! so adding a kind is a compile error everywhere it matters.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Host kind of a data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DataKind {
    String,
    Integer,
    Double,
    Character,
}

impl DataKind {
    /// Returns the class name used in registry property files.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::String => "String",
            DataKind::Integer => "Integer",
            DataKind::Double => "Double",
            DataKind::Character => "Character",
        }
    }

    /// Returns true for kinds serialized with numeric sentinels.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataKind::Integer | DataKind::Double)
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "String" => Ok(DataKind::String),
            "Integer" | "Int" => Ok(DataKind::Integer),
            "Double" => Ok(DataKind::Double),
            "Character" | "Char" => Ok(DataKind::Character),
            other => Err(format!("unknown data class name: {other}")),
        }
    }
}

/// A standardized (non-missing) value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    String(String),
    Int(i32),
    Double(f64),
    Char(char),
}

impl DataValue {
    pub fn kind(&self) -> DataKind {
        match self {
            DataValue::String(_) => DataKind::String,
            DataValue::Int(_) => DataKind::Integer,
            DataValue::Double(_) => DataKind::Double,
            DataValue::Char(_) => DataKind::Character,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            DataValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            DataValue::Double(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            DataValue::Char(value) => Some(*value),
            _ => None,
        }
    }

    /// Parse a value of the given kind from its display text.
    ///
    /// Used for bound thresholds in property files; no unit conversion
    /// or missing-value handling takes place.
    pub fn parse(kind: DataKind, text: &str) -> Result<Self, String> {
        let trimmed = text.trim();
        match kind {
            DataKind::String => Ok(DataValue::String(text.to_string())),
            DataKind::Integer => trimmed
                .parse::<i32>()
                .map(DataValue::Int)
                .map_err(|_| format!("not an integer: {text}")),
            DataKind::Double => trimmed
                .parse::<f64>()
                .map(DataValue::Double)
                .map_err(|_| format!("not a floating-point number: {text}")),
            DataKind::Character => {
                let mut chars = trimmed.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Ok(DataValue::Char(ch)),
                    _ => Err(format!("not a single character: {text}")),
                }
            }
        }
    }

    /// Compares two values of the same kind.
    ///
    /// Returns `None` for values of different kinds or for NaN doubles.
    pub fn compare(&self, other: &DataValue) -> Option<Ordering> {
        match (self, other) {
            (DataValue::String(a), DataValue::String(b)) => Some(a.cmp(b)),
            (DataValue::Int(a), DataValue::Int(b)) => Some(a.cmp(b)),
            (DataValue::Double(a), DataValue::Double(b)) => a.partial_cmp(b),
            (DataValue::Char(a), DataValue::Char(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::String(value) => f.write_str(value),
            DataValue::Int(value) => write!(f, "{value}"),
            DataValue::Double(value) => write!(f, "{value}"),
            DataValue::Char(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::String(value)
    }
}

impl From<i32> for DataValue {
    fn from(value: i32) -> Self {
        DataValue::Int(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Double(value)
    }
}

impl From<char> for DataValue {
    fn from(value: char) -> Self {
        DataValue::Char(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in [
            DataKind::String,
            DataKind::Integer,
            DataKind::Double,
            DataKind::Character,
        ] {
            assert_eq!(kind.as_str().parse::<DataKind>().unwrap(), kind);
        }
        assert!("Float".parse::<DataKind>().is_err());
    }

    #[test]
    fn parse_by_kind() {
        assert_eq!(
            DataValue::parse(DataKind::Integer, " 12 ").unwrap(),
            DataValue::Int(12)
        );
        assert_eq!(
            DataValue::parse(DataKind::Character, "4").unwrap(),
            DataValue::Char('4')
        );
        assert!(DataValue::parse(DataKind::Character, "42").is_err());
        assert!(DataValue::parse(DataKind::Double, "abc").is_err());
    }

    #[test]
    fn compare_requires_same_kind() {
        let a = DataValue::Double(1.0);
        let b = DataValue::Double(2.0);
        assert_eq!(a.compare(&b), Some(Ordering::Less));
        assert_eq!(a.compare(&DataValue::Int(1)), None);
    }
}
