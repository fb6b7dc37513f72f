//! Discrete sampling geometry (DSG) trajectory files.
//!
//! A [`DsgFile`] holds one dataset: its metadata as variables over a
//! `trajectory` dimension of length one, and its sample data as variables
//! over an `obs` dimension. Files are NetCDF-3 classic.
//!
//! Beyond creating and reading whole files, single variables can be read
//! and patched in place, which is how QC flags, region ids and the dataset
//! version are updated after the file is written.
//!
//! ```no_run
//! use dsg_file::{DsgFile, FlagUpdate};
//! use dsg_model::DataLocation;
//!
//! # fn main() -> dsg_file::Result<()> {
//! let file = DsgFile::new("33RO20100105.nc");
//! let mut update = FlagUpdate::new(
//!     "WOCE_CO2_water",
//!     '4',
//!     vec![DataLocation::new(-24.3, 43.2, 1_262_694_600.0)],
//! );
//! let unmatched = file.update_flags_by_location(&mut update, true)?;
//! println!("{} locations not found", unmatched.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod file;
pub mod flags;
pub mod layout;
mod narrow;

pub use error::{DsgFileError, Result};
pub use file::DsgFile;
pub use flags::FlagUpdate;
