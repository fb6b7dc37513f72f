//! Sample times from the date and time columns of a submission.
//!
//! The first complete specification wins, in this order:
//!
//! 1. year, month, day, hour, minute and optionally second
//! 2. year, month, day and time of day
//! 3. year, day of year and second of day
//! 4. date and time
//! 5. date and time of day
//! 6. date, hour, minute and optionally second
//! 7. year and (fractional) day of year

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use dsg_model::DataValue;
use dsg_standards::names;
use dsg_transform::{parse_canonical_date, parse_canonical_time_of_day, parse_canonical_timestamp};

use crate::array::StdDataArray;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// The columns a sample time is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSpec {
    YearMonthDayHourMinute {
        year: usize,
        month: usize,
        day: usize,
        hour: usize,
        minute: usize,
        second: Option<usize>,
    },
    YearMonthDayTimeOfDay {
        year: usize,
        month: usize,
        day: usize,
        time_of_day: usize,
    },
    YearDayOfYearSecondOfDay {
        year: usize,
        day_of_year: usize,
        sec_of_day: usize,
    },
    DateTime {
        date_time: usize,
    },
    DateTimeOfDay {
        date: usize,
        time_of_day: usize,
    },
    DateHourMinute {
        date: usize,
        hour: usize,
        minute: usize,
        second: Option<usize>,
    },
    YearDayOfYear {
        year: usize,
        day_of_year: usize,
    },
}

impl TimeSpec {
    /// Picks the first complete specification among the usable columns.
    pub fn detect(array: &StdDataArray) -> Option<Self> {
        let find = |name: &str| {
            array
                .column_index(name)
                .filter(|&col| array.is_usable(col))
        };
        let year = find(names::YEAR);
        let month = find(names::MONTH_OF_YEAR);
        let day = find(names::DAY_OF_MONTH);
        let hour = find(names::HOUR_OF_DAY);
        let minute = find(names::MINUTE_OF_HOUR);
        let second = find(names::SECOND_OF_MINUTE);
        let time_of_day = find(names::TIME_OF_DAY);
        let day_of_year = find(names::DAY_OF_YEAR);
        let sec_of_day = find(names::SECOND_OF_DAY);
        let date_time = find(names::DATE_TIME);
        let date = find(names::DATE);

        if let (Some(year), Some(month), Some(day)) = (year, month, day) {
            if let (Some(hour), Some(minute)) = (hour, minute) {
                return Some(Self::YearMonthDayHourMinute {
                    year,
                    month,
                    day,
                    hour,
                    minute,
                    second,
                });
            }
            if let Some(time_of_day) = time_of_day {
                return Some(Self::YearMonthDayTimeOfDay {
                    year,
                    month,
                    day,
                    time_of_day,
                });
            }
        }
        if let (Some(year), Some(day_of_year), Some(sec_of_day)) = (year, day_of_year, sec_of_day) {
            return Some(Self::YearDayOfYearSecondOfDay {
                year,
                day_of_year,
                sec_of_day,
            });
        }
        if let Some(date_time) = date_time {
            return Some(Self::DateTime { date_time });
        }
        if let Some(date) = date {
            if let Some(time_of_day) = time_of_day {
                return Some(Self::DateTimeOfDay { date, time_of_day });
            }
            if let (Some(hour), Some(minute)) = (hour, minute) {
                return Some(Self::DateHourMinute {
                    date,
                    hour,
                    minute,
                    second,
                });
            }
        }
        if let (Some(year), Some(day_of_year)) = (year, day_of_year) {
            return Some(Self::YearDayOfYear { year, day_of_year });
        }
        None
    }

    /// Columns used by this specification, in column order.
    pub fn columns(&self) -> Vec<usize> {
        let mut columns = match *self {
            Self::YearMonthDayHourMinute {
                year,
                month,
                day,
                hour,
                minute,
                second,
            } => {
                let mut cols = vec![year, month, day, hour, minute];
                cols.extend(second);
                cols
            }
            Self::YearMonthDayTimeOfDay {
                year,
                month,
                day,
                time_of_day,
            } => vec![year, month, day, time_of_day],
            Self::YearDayOfYearSecondOfDay {
                year,
                day_of_year,
                sec_of_day,
            } => vec![year, day_of_year, sec_of_day],
            Self::DateTime { date_time } => vec![date_time],
            Self::DateTimeOfDay { date, time_of_day } => vec![date, time_of_day],
            Self::DateHourMinute {
                date,
                hour,
                minute,
                second,
            } => {
                let mut cols = vec![date, hour, minute];
                cols.extend(second);
                cols
            }
            Self::YearDayOfYear { year, day_of_year } => vec![year, day_of_year],
        };
        columns.sort_unstable();
        columns
    }

    /// Seconds since 1970-01-01 for one row; `None` if a value is missing
    /// or does not name a real time.
    pub fn sample_time(&self, array: &StdDataArray, row: usize) -> Option<f64> {
        let int = |col: usize| array.value(row, col).and_then(DataValue::as_int);
        let double = |col: usize| array.value(row, col).and_then(DataValue::as_double);
        let text = |col: usize| array.value(row, col).and_then(DataValue::as_str);
        // A missing second column counts as zero; a missing value in a
        // present column does not.
        let second = |col: Option<usize>| match col {
            Some(col) => double(col),
            None => Some(0.0),
        };

        match *self {
            Self::YearMonthDayHourMinute {
                year,
                month,
                day,
                hour,
                minute,
                second: second_col,
            } => {
                let date = calendar_date(int(year)?, int(month)?, int(day)?)?;
                clock_time(date, int(hour)?, int(minute)?, second(second_col)?)
            }
            Self::YearMonthDayTimeOfDay {
                year,
                month,
                day,
                time_of_day,
            } => {
                let date = calendar_date(int(year)?, int(month)?, int(day)?)?;
                let seconds = parse_canonical_time_of_day(text(time_of_day)?)?;
                Some(midnight(date) + seconds)
            }
            Self::YearDayOfYearSecondOfDay {
                year,
                day_of_year,
                sec_of_day,
            } => {
                let seconds = double(sec_of_day)?;
                if !(0.0..=SECONDS_PER_DAY).contains(&seconds) {
                    return None;
                }
                Some(day_of_year_time(int(year)?, double(day_of_year)?)? + seconds)
            }
            Self::DateTime { date_time } => {
                parse_canonical_timestamp(text(date_time)?).map(epoch_seconds)
            }
            Self::DateTimeOfDay { date, time_of_day } => {
                let date = parse_canonical_date(text(date)?)?;
                let seconds = parse_canonical_time_of_day(text(time_of_day)?)?;
                Some(midnight(date) + seconds)
            }
            Self::DateHourMinute {
                date,
                hour,
                minute,
                second: second_col,
            } => {
                let date = parse_canonical_date(text(date)?)?;
                clock_time(date, int(hour)?, int(minute)?, second(second_col)?)
            }
            Self::YearDayOfYear { year, day_of_year } => {
                day_of_year_time(int(year)?, double(day_of_year)?)
            }
        }
    }
}

fn calendar_date(year: i32, month: i32, day: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

fn midnight(date: NaiveDate) -> f64 {
    epoch_seconds(date.and_time(NaiveTime::MIN))
}

fn epoch_seconds(stamp: NaiveDateTime) -> f64 {
    stamp.and_utc().timestamp_millis() as f64 / 1000.0
}

fn clock_time(date: NaiveDate, hour: i32, minute: i32, second: f64) -> Option<f64> {
    if !(0..24).contains(&hour) || !(0..60).contains(&minute) || !(0.0..60.0).contains(&second) {
        return None;
    }
    Some(midnight(date) + f64::from(hour) * 3600.0 + f64::from(minute) * 60.0 + second)
}

/// Day of year is 1.0 at the start of January 1.
fn day_of_year_time(year: i32, day_of_year: f64) -> Option<f64> {
    let days_in_year = if NaiveDate::from_ymd_opt(year, 12, 31)?.leap_year() {
        366.0
    } else {
        365.0
    };
    if !(1.0..days_in_year + 1.0).contains(&day_of_year) {
        return None;
    }
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    Some(midnight(jan1) + (day_of_year - 1.0) * SECONDS_PER_DAY)
}
