//! Names of the data types the engine treats specially.

pub const UNKNOWN: &str = "unknown";
pub const OTHER: &str = "other";

pub const EXPOCODE: &str = "expocode";
pub const SAMPLE_NUMBER: &str = "sample_number";
pub const TIME: &str = "time";
pub const DATASET_NAME: &str = "dataset_name";
pub const PLATFORM_NAME: &str = "platform_name";
pub const PLATFORM_TYPE: &str = "platform_type";
pub const INVESTIGATORS: &str = "investigators";
pub const ORGANIZATION: &str = "organization";
pub const WESTERNMOST_LONGITUDE: &str = "geospatial_lon_min";
pub const EASTERNMOST_LONGITUDE: &str = "geospatial_lon_max";
pub const SOUTHERNMOST_LATITUDE: &str = "geospatial_lat_min";
pub const NORTHERNMOST_LATITUDE: &str = "geospatial_lat_max";
pub const TIME_COVERAGE_START: &str = "time_coverage_start";
pub const TIME_COVERAGE_END: &str = "time_coverage_end";
pub const SOCAT_DOI: &str = "socat_doi";
pub const QC_FLAG: &str = "qc_flag";
pub const SOCAT_VERSION: &str = "socat_version";
pub const ALL_REGION_IDS: &str = "all_region_ids";

pub const LONGITUDE: &str = "longitude";
pub const LATITUDE: &str = "latitude";
pub const SAMPLE_DEPTH: &str = "sample_depth";
pub const REGION_ID: &str = "region_id";

pub const DATE_TIME: &str = "date_time";
pub const DATE: &str = "date";
pub const YEAR: &str = "year";
pub const MONTH_OF_YEAR: &str = "month";
pub const DAY_OF_MONTH: &str = "day";
pub const TIME_OF_DAY: &str = "time_of_day";
pub const HOUR_OF_DAY: &str = "hour";
pub const MINUTE_OF_HOUR: &str = "minute";
pub const SECOND_OF_MINUTE: &str = "second";
pub const DAY_OF_YEAR: &str = "day_of_year";
pub const SECOND_OF_DAY: &str = "sec_of_day";

pub const SST: &str = "temp";
pub const FCO2_REC: &str = "fCO2_recommended";
pub const WOCE_AUTOCHECK: &str = "WOCE_AUTOCHECK";
pub const WOCE_CO2_WATER: &str = "WOCE_CO2_water";
