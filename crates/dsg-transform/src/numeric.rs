//! Numeric converters: linear unit changes, integers and pressure to depth.

use dsg_model::DataValue;

use crate::error::ConvertError;
use crate::missing::MissingValues;

/// Known linear conversions: (from, to, scale, offset).
const LINEAR_CONVERSIONS: &[(&str, &str, f64, f64)] = &[
    ("K", "degrees C", 1.0, -273.15),
    ("degrees F", "degrees C", 5.0 / 9.0, -32.0 * 5.0 / 9.0),
    ("kPa", "hPa", 10.0, 0.0),
    ("mmHg", "hPa", 1.333_223_684, 0.0),
    ("mbar", "hPa", 1.0, 0.0),
    ("ppm", "umol/mol", 1.0, 0.0),
    ("Pa", "uatm", 9.869_23, 0.0),
    ("m", "km", 0.001, 0.0),
    ("nmi", "km", 1.852, 0.0),
    ("Jan1=0.0", "Jan1=1.0", 1.0, 1.0),
];

/// Parses a finite double, rejecting infinities.
pub(crate) fn parse_double(raw: &str) -> Result<f64, ConvertError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ConvertError::invalid("not a valid number")),
    }
}

/// `value * scale + offset`, or a verbatim parse when the units agree.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConverter {
    scale: f64,
    offset: f64,
    missing: MissingValues,
}

impl LinearConverter {
    pub fn identity(missing: MissingValues) -> Self {
        Self {
            scale: 1.0,
            offset: 0.0,
            missing,
        }
    }

    /// Looks up the conversion between two units.
    pub fn between(from: &str, to: &str, missing: MissingValues) -> Result<Self, ConvertError> {
        if from == to {
            return Ok(Self::identity(missing));
        }
        LINEAR_CONVERSIONS
            .iter()
            .find(|(source, target, _, _)| *source == from && *target == to)
            .map(|&(_, _, scale, offset)| Self {
                scale,
                offset,
                missing,
            })
            .ok_or_else(|| ConvertError::UnknownConversion {
                from: from.to_string(),
                to: to.to_string(),
            })
    }

    pub fn convert(&self, raw: &str) -> Result<Option<DataValue>, ConvertError> {
        if self.missing.is_missing_text(raw) {
            return Ok(None);
        }
        let value = parse_double(raw)?;
        if self.missing.is_missing_number(value, false) {
            return Ok(None);
        }
        if self.scale == 1.0 && self.offset == 0.0 {
            return Ok(Some(DataValue::Double(value)));
        }
        Ok(Some(DataValue::Double(value * self.scale + self.offset)))
    }
}

/// Whole numbers; an integral decimal such as `12.0` is accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerConverter {
    missing: MissingValues,
}

impl IntegerConverter {
    pub fn new(missing: MissingValues) -> Self {
        Self { missing }
    }

    pub fn convert(&self, raw: &str) -> Result<Option<DataValue>, ConvertError> {
        if self.missing.is_missing_text(raw) {
            return Ok(None);
        }
        let trimmed = raw.trim();
        let value = match trimmed.parse::<i32>() {
            Ok(value) => f64::from(value),
            Err(_) => {
                let value = parse_double(trimmed).map_err(|_| ConvertError::invalid("not an integer"))?;
                if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX)
                {
                    return Err(ConvertError::invalid("not an integer"));
                }
                value
            }
        };
        if self.missing.is_missing_number(value, true) {
            return Ok(None);
        }
        Ok(Some(DataValue::Int(value as i32)))
    }
}

/// Seawater pressure in decibars to depth in meters (UNESCO 1983).
#[derive(Debug, Clone, PartialEq)]
pub struct PressureToDepthConverter {
    missing: MissingValues,
}

impl PressureToDepthConverter {
    pub fn new(missing: MissingValues) -> Self {
        Self { missing }
    }

    pub fn convert(&self, raw: &str, latitude: Option<f64>) -> Result<Option<DataValue>, ConvertError> {
        if self.missing.is_missing_text(raw) {
            return Ok(None);
        }
        let pressure = parse_double(raw)?;
        if self.missing.is_missing_number(pressure, false) {
            return Ok(None);
        }
        let latitude = latitude
            .ok_or_else(|| ConvertError::invalid("no latitude to convert pressure to depth"))?;
        Ok(Some(DataValue::Double(pressure_to_depth(pressure, latitude))))
    }
}

/// Depth in meters for a pressure in decibars at the given latitude.
pub fn pressure_to_depth(pressure: f64, latitude: f64) -> f64 {
    let x = latitude.to_radians().sin().powi(2);
    let gravity = 9.780_318 * (1.0 + (5.2788e-3 + 2.36e-5 * x) * x) + 1.092e-6 * pressure;
    let numerator =
        (((-1.82e-15 * pressure + 2.279e-10) * pressure - 2.2512e-5) * pressure + 9.72659) * pressure;
    numerator / gravity
}
