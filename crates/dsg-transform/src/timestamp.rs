//! Date, time-of-day and timestamp text.
//!
//! Input orders are given by the unit (`yyyy-mm-dd`, `mm-dd-yy`, ...).
//! Output is always the canonical text:
//!
//! - timestamp: `yyyy-mm-dd hh:mm:ss.sss`
//! - date: `yyyy-mm-dd`
//! - time of day: `hh:mm:ss.sss`

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use dsg_model::DataValue;
use regex::Regex;

use crate::error::ConvertError;
use crate::missing::MissingValues;

/// Two-digit years below this are in the 2000s.
pub const TWO_DIGIT_YEAR_PIVOT: i32 = 50;

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

static DATE_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+|\d{1,4})[-/. ]+([A-Za-z]+|\d{1,2})[-/. ]+([A-Za-z]+|\d{1,4})(.*)$")
        .expect("Invalid date regex")
});

static TIME_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):?(\d{2})(?::?(\d{2}(?:\.\d*)?))?$")
        .expect("Invalid time regex")
});

/// Field order of a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    YearMonthDay,
    MonthDayYear,
    DayMonthYear,
}

/// What the converter produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampKind {
    Timestamp(DateOrder),
    Date(DateOrder),
    TimeOfDay,
}

impl TimestampKind {
    /// Recognizes the timestamp, date and time-of-day units.
    pub fn for_unit(unit: &str) -> Option<Self> {
        let unit = unit.trim();
        if unit == "hh:mm:ss" {
            return Some(Self::TimeOfDay);
        }
        let (date, with_time) = match unit.strip_suffix(" hh:mm:ss") {
            Some(date) => (date, true),
            None => (unit, false),
        };
        let order = match date {
            "yyyy-mm-dd" | "yy-mm-dd" => DateOrder::YearMonthDay,
            "mm-dd-yyyy" | "mm-dd-yy" => DateOrder::MonthDayYear,
            "dd-mm-yyyy" | "dd-mm-yy" => DateOrder::DayMonthYear,
            _ => return None,
        };
        Some(if with_time {
            Self::Timestamp(order)
        } else {
            Self::Date(order)
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimestampConverter {
    kind: TimestampKind,
    missing: MissingValues,
}

impl TimestampConverter {
    pub fn new(kind: TimestampKind, missing: MissingValues) -> Self {
        Self { kind, missing }
    }

    pub fn convert(&self, raw: &str) -> Result<Option<DataValue>, ConvertError> {
        if self.missing.is_missing_text(raw) {
            return Ok(None);
        }
        let text = raw.trim();
        let text = text
            .strip_suffix('Z')
            .or_else(|| text.strip_suffix('z'))
            .unwrap_or(text)
            .trim_end();
        let canonical = match self.kind {
            TimestampKind::TimeOfDay => format_time(parse_time(text)?),
            TimestampKind::Date(order) => {
                let (date, rest) = parse_date(text, order)?;
                if !rest.is_empty() {
                    return Err(ConvertError::invalid("unexpected text after the date"));
                }
                format_date(date)
            }
            TimestampKind::Timestamp(order) => {
                let (date, rest) = parse_date(text, order)?;
                let rest = rest.trim_start_matches(|c: char| c == 'T' || c == 't' || c.is_whitespace());
                let time = if rest.is_empty() {
                    NaiveTime::MIN
                } else {
                    parse_time(rest)?
                };
                format!("{} {}", format_date(date), format_time(time))
            }
        };
        Ok(Some(DataValue::String(canonical)))
    }
}

fn parse_month(token: &str) -> Option<u32> {
    if let Ok(number) = token.parse::<u32>() {
        return Some(number);
    }
    let lower = token.to_ascii_lowercase();
    if lower.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|name| name.starts_with(&lower))
        .and_then(|index| u32::try_from(index + 1).ok())
}

fn parse_year(token: &str) -> Option<i32> {
    let year = token.parse::<i32>().ok()?;
    if token.len() <= 2 {
        Some(if year < TWO_DIGIT_YEAR_PIVOT {
            2000 + year
        } else {
            1900 + year
        })
    } else {
        Some(year)
    }
}

/// Parses the leading date; returns it with the unparsed remainder.
fn parse_date(text: &str, order: DateOrder) -> Result<(NaiveDate, &str), ConvertError> {
    let captures = DATE_PART
        .captures(text)
        .ok_or_else(|| ConvertError::invalid("not a recognized date"))?;
    let field = |index: usize| captures.get(index).map_or("", |m| m.as_str());
    let (year, month, day) = match order {
        DateOrder::YearMonthDay => (field(1), field(2), field(3)),
        DateOrder::MonthDayYear => (field(3), field(1), field(2)),
        DateOrder::DayMonthYear => (field(3), field(2), field(1)),
    };
    let year = parse_year(year).ok_or_else(|| ConvertError::invalid("invalid year"))?;
    let month = parse_month(month).ok_or_else(|| ConvertError::invalid("invalid month"))?;
    let day: u32 = day
        .parse()
        .map_err(|_| ConvertError::invalid("invalid day"))?;
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ConvertError::invalid("invalid date"))?;
    let rest = captures.get(4).map_or("", |m| m.as_str());
    Ok((date, rest))
}

fn parse_time(text: &str) -> Result<NaiveTime, ConvertError> {
    let captures = TIME_PART
        .captures(text.trim())
        .ok_or_else(|| ConvertError::invalid("not a recognized time"))?;
    let hour: u32 = captures[1]
        .parse()
        .map_err(|_| ConvertError::invalid("invalid hour"))?;
    let minute: u32 = captures[2]
        .parse()
        .map_err(|_| ConvertError::invalid("invalid minute"))?;
    let seconds: f64 = match captures.get(3) {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|_| ConvertError::invalid("invalid second"))?,
        None => 0.0,
    };
    if hour > 23 || minute > 59 || !(0.0..60.0).contains(&seconds) {
        return Err(ConvertError::invalid("invalid time"));
    }
    let millis = ((seconds * 1000.0).round() as u32).min(59_999);
    NaiveTime::from_hms_milli_opt(hour, minute, millis / 1000, millis % 1000)
        .ok_or_else(|| ConvertError::invalid("invalid time"))
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn format_time(time: NaiveTime) -> String {
    let millis = time.nanosecond() / 1_000_000;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        time.hour(),
        time.minute(),
        time.second(),
        millis
    )
}

/// Parses canonical `yyyy-mm-dd hh:mm:ss.sss` text.
pub fn parse_canonical_timestamp(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f").ok()
}

/// Parses canonical `yyyy-mm-dd` text.
pub fn parse_canonical_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Parses canonical `hh:mm:ss.sss` text into seconds of the day.
pub fn parse_canonical_time_of_day(text: &str) -> Option<f64> {
    let time = NaiveTime::parse_from_str(text, "%H:%M:%S%.f").ok()?;
    Some(
        f64::from(time.num_seconds_from_midnight())
            + f64::from(time.nanosecond()) / 1.0e9,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(unit: &str, raw: &str) -> Result<Option<String>, ConvertError> {
        let kind = TimestampKind::for_unit(unit).expect("known unit");
        TimestampConverter::new(kind, MissingValues::default())
            .convert(raw)
            .map(|value| value.and_then(|v| v.as_str().map(ToString::to_string)))
    }

    #[test]
    fn timestamps_in_each_order() {
        assert_eq!(
            convert("yyyy-mm-dd hh:mm:ss", "2010-01-05T12:30:15Z").unwrap().as_deref(),
            Some("2010-01-05 12:30:15.000")
        );
        assert_eq!(
            convert("mm-dd-yyyy hh:mm:ss", "01/05/2010 12:30").unwrap().as_deref(),
            Some("2010-01-05 12:30:00.000")
        );
        assert_eq!(
            convert("dd-mm-yy hh:mm:ss", "05.01.10 12:30:15.25").unwrap().as_deref(),
            Some("2010-01-05 12:30:15.250")
        );
        assert_eq!(
            convert("dd-mm-yyyy hh:mm:ss", "05-Jan-2010 01:02:03").unwrap().as_deref(),
            Some("2010-01-05 01:02:03.000")
        );
    }

    #[test]
    fn dates() {
        assert_eq!(
            convert("yyyy-mm-dd", "2010/1/5").unwrap().as_deref(),
            Some("2010-01-05")
        );
        assert_eq!(
            convert("mm-dd-yy", "September 5 99").unwrap().as_deref(),
            Some("1999-09-05")
        );
        assert_eq!(
            convert("mm-dd-yy", "1-5-49").unwrap().as_deref(),
            Some("2049-01-05")
        );
        assert_eq!(
            convert("yyyy-mm-dd", "2010-02-31").unwrap_err(),
            ConvertError::invalid("invalid date")
        );
        assert!(convert("yyyy-mm-dd", "2010-01-05 12:00").is_err());
    }

    #[test]
    fn times_of_day() {
        assert_eq!(
            convert("hh:mm:ss", "7:05:09").unwrap().as_deref(),
            Some("07:05:09.000")
        );
        assert_eq!(
            convert("hh:mm:ss", "235959.9996").unwrap().as_deref(),
            Some("23:59:59.999")
        );
        assert!(convert("hh:mm:ss", "24:00:00").is_err());
        assert_eq!(convert("hh:mm:ss", "--").unwrap(), None);
    }

    #[test]
    fn canonical_parsing() {
        let stamp = parse_canonical_timestamp("2010-01-05 12:30:15.250").unwrap();
        assert_eq!(stamp.and_utc().timestamp_millis(), 1_262_694_615_250);
        assert!(parse_canonical_date("2010-02-31").is_none());
        assert_eq!(parse_canonical_time_of_day("01:00:01.500"), Some(3601.5));
    }
}
