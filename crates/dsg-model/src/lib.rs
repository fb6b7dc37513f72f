//! Core model for oceanographic discrete-sampling-geometry (DSG) datasets.
//!
//! Data columns are described by immutable [`DataType`] descriptors whose
//! values are one of four host kinds ([`DataKind`] / [`DataValue`]).
//! Quality problems found while standardizing or checking data are
//! [`Diagnostic`]s with a [`Severity`].

pub mod datatype;
pub mod diagnostic;
pub mod enums;
pub mod error;
pub mod geo;
pub mod kind;
pub mod location;
pub mod missing;

pub use datatype::{Bounds, DataType, DataTypeBuilder, name_key};
pub use diagnostic::{BoundsViolation, Diagnostic, Severity, SeverityCounts};
pub use enums::{Role, category, units, woce};
pub use error::{ModelError, Result};
pub use geo::{EARTH_AUTHALIC_RADIUS, KM_PER_HOUR_TO_KNOTS, fold_longitude, haversine_km};
pub use kind::{DataKind, DataValue};
pub use location::DataLocation;
pub use missing::{
    CHAR_MISSING_VALUE, FP_MISSING_VALUE, INT_MISSING_VALUE, MAX_ABSOLUTE_ERROR,
    MAX_RELATIVE_ERROR, STRING_MISSING_VALUE, close_to, is_fp_missing, longitude_close_to,
};
