//! NetCDF-3 classic format reader, writer and patcher.
//!
//! Only what trajectory files need is supported: fixed-size dimensions
//! (no record dimension), global and variable attributes, and variables
//! of any classic type.
//!
//! ```no_run
//! use std::path::Path;
//! use dsg_nc::{Attribute, NcDefinition, NcFile, NcType, NcWriter, Values};
//!
//! let mut definition = NcDefinition::new();
//! let obs = definition.add_dimension("obs", 2).unwrap();
//! let time = definition.add_variable("time", NcType::Double, &[obs]).unwrap();
//! definition
//!     .add_variable_attribute(time, Attribute::text("units", "seconds since 1970-01-01T00:00:00Z"))
//!     .unwrap();
//!
//! let path = Path::new("track.nc");
//! let mut writer = NcWriter::create(path, definition).unwrap();
//! writer.put("time", &Values::Doubles(vec![0.0, 60.0])).unwrap();
//! writer.finish().unwrap();
//!
//! let file = NcFile::open(path).unwrap();
//! assert_eq!(file.read_doubles("time").unwrap(), vec![0.0, 60.0]);
//! ```

mod error;
pub mod header;
mod patcher;
mod reader;
mod types;
mod writer;

pub use error::{NcError, Result};
pub use header::Header;
pub use patcher::NcPatcher;
pub use reader::NcFile;
pub use types::{Attribute, Dimension, NcType, Values, Variable, text_rows};
pub use writer::{NcDefinition, NcWriter};
