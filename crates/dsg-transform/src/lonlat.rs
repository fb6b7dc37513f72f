//! Longitude and latitude in degree, degree-minute, degree-minute-second
//! and packed `DDD.MMSSss` notations.

use dsg_model::{DataValue, fold_longitude};

use crate::error::ConvertError;
use crate::missing::MissingValues;
use crate::numeric::parse_double;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notation {
    Degrees,
    DegreesMinutes,
    DegreesMinutesSeconds,
    Packed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Longitude,
    Latitude,
}

/// Converter to signed decimal degrees east or north.
#[derive(Debug, Clone, PartialEq)]
pub struct LonLatConverter {
    notation: Notation,
    axis: Axis,
    negate: bool,
    missing: MissingValues,
}

impl LonLatConverter {
    /// Returns `None` for a unit that is not a longitude or latitude unit.
    pub fn for_unit(unit: &str, missing: MissingValues) -> Option<Self> {
        let (body, hemisphere) = unit.trim().rsplit_once(' ')?;
        let (axis, negate) = match hemisphere {
            "E" => (Axis::Longitude, false),
            "W" => (Axis::Longitude, true),
            "N" => (Axis::Latitude, false),
            "S" => (Axis::Latitude, true),
            _ => return None,
        };
        let notation = match body {
            "deg" => Notation::Degrees,
            "deg min" => Notation::DegreesMinutes,
            "deg min sec" => Notation::DegreesMinutesSeconds,
            "DDD.MMSSss" if axis == Axis::Longitude => Notation::Packed,
            "DD.MMSSss" if axis == Axis::Latitude => Notation::Packed,
            _ => return None,
        };
        Some(Self {
            notation,
            axis,
            negate,
            missing,
        })
    }

    pub fn convert(&self, raw: &str) -> Result<Option<DataValue>, ConvertError> {
        if self.missing.is_missing_text(raw) {
            return Ok(None);
        }
        let (text, hemisphere) = self.strip_hemisphere(raw.trim());
        let value = match self.notation {
            Notation::Degrees => parse_double(text)?,
            Notation::DegreesMinutes => parse_sexagesimal(text, 2)?,
            Notation::DegreesMinutesSeconds => parse_sexagesimal(text, 3)?,
            Notation::Packed => parse_packed(text)?,
        };
        if self.missing.is_missing_number(value, false) {
            return Ok(None);
        }
        // A letter in the cell gives the sign on its own; the unit's
        // hemisphere only applies to bare numbers.
        let mut value = match hemisphere {
            Some(true) => -value.abs(),
            Some(false) => value.abs(),
            None if self.negate => -value,
            None => value,
        };
        if self.axis == Axis::Longitude && self.notation == Notation::Degrees {
            value = fold_longitude(value);
        }
        Ok(Some(DataValue::Double(value)))
    }

    /// Strips a trailing hemisphere letter and reports whether it names
    /// the negative hemisphere (W or S).
    fn strip_hemisphere<'a>(&self, text: &'a str) -> (&'a str, Option<bool>) {
        let letters: &[(char, bool)] = match self.axis {
            Axis::Longitude => &[('E', false), ('W', true)],
            Axis::Latitude => &[('N', false), ('S', true)],
        };
        for &(letter, negative) in letters {
            if let Some(rest) = text
                .strip_suffix(letter)
                .or_else(|| text.strip_suffix(letter.to_ascii_lowercase()))
            {
                return (rest.trim_end(), Some(negative));
            }
        }
        (text, None)
    }
}

fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '°' | '\'' | '"' | ':' | '′' | '″')
}

/// Degrees followed by minutes (and seconds); the sign of the degrees
/// applies to the whole value.
fn parse_sexagesimal(text: &str, parts: usize) -> Result<f64, ConvertError> {
    let pieces: Vec<&str> = text.split(is_separator).filter(|p| !p.is_empty()).collect();
    if pieces.is_empty() || pieces.len() > parts {
        return Err(ConvertError::invalid(format!(
            "expected {parts} numbers for degrees, minutes{}",
            if parts == 3 { " and seconds" } else { "" }
        )));
    }
    let degrees = parse_double(pieces[0])?;
    let negative = degrees < 0.0 || pieces[0].starts_with('-');
    let mut magnitude = degrees.abs();
    let mut scale = 1.0;
    for piece in &pieces[1..] {
        let part = parse_double(piece)?;
        if !(0.0..60.0).contains(&part) {
            return Err(ConvertError::invalid("minutes and seconds must be less than 60"));
        }
        scale /= 60.0;
        magnitude += part * scale;
    }
    Ok(if negative { -magnitude } else { magnitude })
}

/// `DDD.MMSSss`: degrees, two digits of minutes, then seconds.
fn parse_packed(text: &str) -> Result<f64, ConvertError> {
    let value = parse_double(text)?;
    let magnitude = value.abs();
    let degrees = magnitude.trunc();
    let rest = (magnitude - degrees) * 100.0;
    let minutes = (rest + 1.0e-9).trunc();
    let seconds = ((rest - minutes) * 100.0).max(0.0);
    if minutes >= 60.0 || seconds >= 60.0 {
        return Err(ConvertError::invalid("minutes and seconds must be less than 60"));
    }
    let result = degrees + minutes / 60.0 + seconds / 3600.0;
    Ok(if value < 0.0 { -result } else { result })
}
