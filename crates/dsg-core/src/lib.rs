//! Standardization core.
//!
//! [`StdUserDataArray::standardize`] turns raw submission rows into a typed
//! [`StdDataArray`], converting each column in dependency order and
//! recording unconvertible cells as diagnostics. The sample time of each
//! row is derived from whichever date and time columns were given
//! ([`TimeSpec`]). [`MetadataRecord`] holds the dataset-level values
//! written next to the sample data.

pub mod array;
pub mod assignment;
pub mod error;
pub mod metadata;
pub mod options;
pub mod resolver;
pub mod sample_time;
pub mod user;

pub use array::{StdDataArray, string_dimension_length};
pub use assignment::ColumnAssignment;
pub use error::{Result, StandardizeError};
pub use metadata::MetadataRecord;
pub use options::{DEFAULT_SPEED_ERROR_KNOTS, DEFAULT_SPEED_WARNING_KNOTS, StandardizeOptions};
pub use resolver::resolution_order;
pub use sample_time::TimeSpec;
pub use user::StdUserDataArray;
