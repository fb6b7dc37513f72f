//! Converter selection for a column assignment.

use dsg_model::{DataKind, DataType, DataValue};
use tracing::trace;

use crate::error::ConvertError;
use crate::lonlat::LonLatConverter;
use crate::missing::MissingValues;
use crate::numeric::{IntegerConverter, LinearConverter, PressureToDepthConverter};
use crate::timestamp::{TimestampConverter, TimestampKind};

/// Name of the latitude type, required by the pressure-to-depth converter.
pub const LATITUDE: &str = "latitude";

/// Trimmed text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextConverter {
    missing: MissingValues,
}

impl TextConverter {
    pub fn new(missing: MissingValues) -> Self {
        Self { missing }
    }

    pub fn convert(&self, raw: &str) -> Result<Option<DataValue>, ConvertError> {
        if self.missing.is_missing_text(raw) {
            return Ok(None);
        }
        Ok(Some(DataValue::String(raw.trim().to_string())))
    }
}

/// Exactly one non-blank character.
#[derive(Debug, Clone, PartialEq)]
pub struct CharConverter {
    missing: MissingValues,
}

impl CharConverter {
    pub fn new(missing: MissingValues) -> Self {
        Self { missing }
    }

    pub fn convert(&self, raw: &str) -> Result<Option<DataValue>, ConvertError> {
        if self.missing.is_missing_text(raw) {
            return Ok(None);
        }
        let mut chars = raw.trim().chars();
        match (chars.next(), chars.next()) {
            // Stored as a single byte in the file.
            (Some(ch), None) if u32::from(ch) > 0xFF => {
                Err(ConvertError::invalid("character outside Latin-1"))
            }
            (Some(ch), None) => Ok(Some(DataValue::Char(ch))),
            _ => Err(ConvertError::invalid("more than one character")),
        }
    }
}

/// The converter for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum Converter {
    Text(TextConverter),
    Integer(IntegerConverter),
    Character(CharConverter),
    Linear(LinearConverter),
    PressureToDepth(PressureToDepthConverter),
    LonLat(LonLatConverter),
    Timestamp(TimestampConverter),
}

impl Converter {
    /// Selects the converter for values of `data_type` given in `unit`.
    ///
    /// An empty unit means the canonical unit. A unit outside the type's
    /// unit list, or a pair with no known conversion, is a configuration
    /// error.
    pub fn new(
        data_type: &DataType,
        unit: &str,
        missing: Option<&str>,
    ) -> Result<Self, ConvertError> {
        let canonical = data_type.canonical_unit();
        let unit = match unit.trim() {
            "" => canonical,
            given => given,
        };
        if !data_type.units().iter().any(|known| known == unit) {
            return Err(ConvertError::UnsupportedUnit {
                unit: unit.to_string(),
                name: data_type.var_name().to_string(),
            });
        }
        let missing = MissingValues::new(missing);
        let converter = match data_type.kind() {
            DataKind::String => match TimestampKind::for_unit(unit) {
                Some(kind) => Converter::Timestamp(TimestampConverter::new(kind, missing)),
                None => Converter::Text(TextConverter::new(missing)),
            },
            DataKind::Integer => Converter::Integer(IntegerConverter::new(missing)),
            DataKind::Character => Converter::Character(CharConverter::new(missing)),
            DataKind::Double => {
                if let Some(lonlat) = LonLatConverter::for_unit(unit, missing.clone()) {
                    Converter::LonLat(lonlat)
                } else if unit == "dbar" && canonical == "meters" {
                    Converter::PressureToDepth(PressureToDepthConverter::new(missing))
                } else {
                    Converter::Linear(LinearConverter::between(unit, canonical, missing)?)
                }
            }
        };
        trace!(
            name = data_type.var_name(),
            unit,
            converter = converter.name(),
            "selected converter"
        );
        Ok(converter)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Converter::Text(_) => "text",
            Converter::Integer(_) => "integer",
            Converter::Character(_) => "character",
            Converter::Linear(_) => "linear",
            Converter::PressureToDepth(_) => "pressure-to-depth",
            Converter::LonLat(_) => "lon-lat",
            Converter::Timestamp(_) => "timestamp",
        }
    }

    /// Names of the types whose standardized values this converter needs.
    pub fn requires(&self) -> &'static [&'static str] {
        match self {
            Converter::PressureToDepth(_) => &[LATITUDE],
            Converter::Text(_)
            | Converter::Integer(_)
            | Converter::Character(_)
            | Converter::Linear(_)
            | Converter::LonLat(_)
            | Converter::Timestamp(_) => &[],
        }
    }

    /// Converts a value that needs no other column.
    pub fn convert(&self, raw: &str) -> Result<Option<DataValue>, ConvertError> {
        self.convert_with(raw, &[])
    }

    /// Converts a value; `dependencies` are the row's standardized values
    /// for the types in [`Converter::requires`], in that order.
    pub fn convert_with(
        &self,
        raw: &str,
        dependencies: &[Option<&DataValue>],
    ) -> Result<Option<DataValue>, ConvertError> {
        match self {
            Converter::Text(conv) => conv.convert(raw),
            Converter::Integer(conv) => conv.convert(raw),
            Converter::Character(conv) => conv.convert(raw),
            Converter::Linear(conv) => conv.convert(raw),
            Converter::LonLat(conv) => conv.convert(raw),
            Converter::Timestamp(conv) => conv.convert(raw),
            Converter::PressureToDepth(conv) => {
                let latitude = dependencies
                    .first()
                    .copied()
                    .flatten()
                    .and_then(DataValue::as_double);
                conv.convert(raw, latitude)
            }
        }
    }
}
