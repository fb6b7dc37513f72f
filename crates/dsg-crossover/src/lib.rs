//! Crossover detection.
//!
//! A crossover is a pair of samples from two different platforms close
//! enough in space, time, sea surface temperature and fCO2 to have
//! measured the same water. [`find_crossover`] returns the closest such
//! pair of two datasets, [`find_crossovers`] checks one dataset against
//! many.

pub mod error;
pub mod limits;
pub mod search;
pub mod series;

pub use error::{CrossoverError, Result};
pub use limits::CrossoverLimits;
pub use search::{Crossover, find_crossover, find_crossovers};
pub use series::CrossoverSeries;
