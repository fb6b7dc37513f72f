//! Type-safe enumerations and well-known names for data types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pipelines that may use a data type.
///
/// - **UserData**: a column a contributor may assign in an upload
/// - **FileData**: a per-sample variable in the DSG file
/// - **FileMetadata**: a per-dataset variable in the DSG file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    UserData,
    FileData,
    FileMetadata,
}

impl Role {
    /// Returns the token used in registry property files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::UserData => "USER_DATA",
            Role::FileData => "FILE_DATA",
            Role::FileMetadata => "FILE_METADATA",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USER_DATA" => Ok(Role::UserData),
            "FILE_DATA" => Ok(Role::FileData),
            "FILE_METADATA" => Ok(Role::FileMetadata),
            _ => Err(format!("unknown data type role: {s}")),
        }
    }
}

/// ioos_category names.
pub mod category {
    pub const BATHYMETRY: &str = "Bathymetry";
    pub const CO2: &str = "CO2";
    pub const IDENTIFIER: &str = "Identifier";
    pub const LOCATION: &str = "Location";
    pub const METEOROLOGY: &str = "Meteorology";
    pub const OTHER: &str = "Other";
    pub const PLATFORM: &str = "Platform";
    pub const PRESSURE: &str = "Pressure";
    pub const QUALITY: &str = "Quality";
    pub const SALINITY: &str = "Salinity";
    pub const TEMPERATURE: &str = "Temperature";
    pub const TIME: &str = "Time";
}

/// Unit strings. The first entry of each list is the canonical unit.
pub mod units {
    /// Units of data types without units.
    pub const NO_UNITS: &[&str] = &[""];

    pub const TIME_UNITS: &[&str] = &["seconds since 1970-01-01T00:00:00Z"];

    pub const TIMESTAMP_UNITS: &[&str] = &[
        "yyyy-mm-dd hh:mm:ss",
        "mm-dd-yyyy hh:mm:ss",
        "dd-mm-yyyy hh:mm:ss",
        "mm-dd-yy hh:mm:ss",
        "dd-mm-yy hh:mm:ss",
    ];

    pub const DATE_UNITS: &[&str] = &[
        "yyyy-mm-dd",
        "mm-dd-yyyy",
        "dd-mm-yyyy",
        "mm-dd-yy",
        "dd-mm-yy",
    ];

    pub const TIME_OF_DAY_UNITS: &[&str] = &["hh:mm:ss"];

    pub const DAY_OF_YEAR_UNITS: &[&str] = &["Jan1=1.0", "Jan1=0.0"];

    pub const SECONDS_UNITS: &[&str] = &["seconds"];

    pub const LONGITUDE_UNITS: &[&str] = &[
        "deg E",
        "deg min E",
        "deg min sec E",
        "DDD.MMSSss E",
        "deg W",
        "deg min W",
        "deg min sec W",
        "DDD.MMSSss W",
    ];

    pub const LATITUDE_UNITS: &[&str] = &[
        "deg N",
        "deg min N",
        "deg min sec N",
        "DD.MMSSss N",
        "deg S",
        "deg min S",
        "deg min sec S",
        "DD.MMSSss S",
    ];

    pub const DEPTH_UNITS: &[&str] = &["meters", "dbar"];

    pub const PRESSURE_UNITS: &[&str] = &["hPa", "kPa", "mmHg", "mbar"];

    pub const TEMPERATURE_UNITS: &[&str] = &["degrees C", "K", "degrees F"];

    pub const SALINITY_UNITS: &[&str] = &["PSU"];

    pub const XCO2_UNITS: &[&str] = &["umol/mol", "ppm"];

    pub const PCO2_UNITS: &[&str] = &["uatm", "Pa"];

    pub const DISTANCE_UNITS: &[&str] = &["km", "m", "nmi"];
}

/// WOCE flag values.
pub mod woce {
    pub const ACCEPTABLE: char = '2';
    pub const QUESTIONABLE: char = '3';
    pub const BAD: char = '4';
}
