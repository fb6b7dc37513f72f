//! Converters from raw submission text to canonical values.
//!
//! - **converter**: the closed [`Converter`] enum chosen per column
//! - **numeric**: linear unit changes, integers, pressure to depth
//! - **lonlat**: degree, degree-minute(-second) and packed positions
//! - **timestamp**: dates, times of day and timestamps
//! - **missing**: the missing-value vocabulary shared by all converters

pub mod converter;
pub mod error;
pub mod lonlat;
pub mod missing;
pub mod numeric;
pub mod timestamp;

pub use converter::{CharConverter, Converter, TextConverter};
pub use error::ConvertError;
pub use lonlat::LonLatConverter;
pub use missing::MissingValues;
pub use numeric::{IntegerConverter, LinearConverter, PressureToDepthConverter, pressure_to_depth};
pub use timestamp::{
    TWO_DIGIT_YEAR_PIVOT, TimestampConverter, TimestampKind, parse_canonical_date,
    parse_canonical_time_of_day, parse_canonical_timestamp,
};
