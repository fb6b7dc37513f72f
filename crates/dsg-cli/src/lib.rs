//! Library parts of the `dsg` command line tool.

pub mod listing;
pub mod locations;
pub mod logging;
pub mod style;
