//! Sample series compared by the crossover search.

use dsg_file::DsgFile;
use dsg_model::is_fp_missing;
use dsg_standards::names;

use crate::error::{CrossoverError, Result};

/// Parallel longitude, latitude, time, SST and fCO2 values of one dataset.
///
/// Missing values are sentinels or non-finite, as read from a DSG file.
/// Samples should be in time order; the search relies on it to stop early.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossoverSeries {
    dataset_id: String,
    longitudes: Vec<f64>,
    latitudes: Vec<f64>,
    times: Vec<f64>,
    ssts: Vec<f64>,
    fco2s: Vec<f64>,
}

/// One complete sample of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Sample {
    pub longitude: f64,
    pub latitude: f64,
    pub time: f64,
    pub sst: f64,
    pub fco2: f64,
}

impl CrossoverSeries {
    /// Builds a series from `[longitudes, latitudes, times, ssts, fco2s]`.
    ///
    /// The dataset id is trimmed and upper-cased; its first four
    /// characters name the platform.
    pub fn new(dataset_id: &str, values: [Vec<f64>; 5]) -> Result<Self> {
        let dataset_id = dataset_id.trim().to_uppercase();
        if dataset_id.chars().count() < 4 {
            return Err(CrossoverError::InvalidDatasetId { dataset: dataset_id });
        }
        let [longitudes, latitudes, times, ssts, fco2s] = values;
        let expected = longitudes.len();
        for (name, column) in [
            ("latitude", &latitudes),
            ("time", &times),
            ("SST", &ssts),
            ("fCO2", &fco2s),
        ] {
            if column.len() != expected {
                return Err(CrossoverError::LengthMismatch {
                    dataset: dataset_id,
                    name,
                    expected,
                    actual: column.len(),
                });
            }
        }
        Ok(Self {
            dataset_id,
            longitudes,
            latitudes,
            times,
            ssts,
            fco2s,
        })
    }

    /// Reads the series of a DSG file; the dataset id is the file's
    /// `expocode` value.
    pub fn from_dsg_file(file: &DsgFile) -> Result<Self> {
        let dataset_id = file
            .read_string_values(names::EXPOCODE)?
            .into_iter()
            .next()
            .unwrap_or_default();
        Self::new(&dataset_id, file.read_lon_lat_time_sst_fco2()?)
    }

    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    /// The first four characters of the dataset id.
    pub fn platform_code(&self) -> &str {
        let end = self
            .dataset_id
            .char_indices()
            .nth(4)
            .map_or(self.dataset_id.len(), |(index, _)| index);
        &self.dataset_id[..end]
    }

    pub fn len(&self) -> usize {
        self.longitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.longitudes.is_empty()
    }

    /// Copies of `[longitudes, latitudes, times, ssts, fco2s]`.
    pub fn columns(&self) -> [Vec<f64>; 5] {
        [
            self.longitudes.clone(),
            self.latitudes.clone(),
            self.times.clone(),
            self.ssts.clone(),
            self.fco2s.clone(),
        ]
    }

    /// The sample at `index`, or `None` if any of its values is missing.
    pub(crate) fn sample(&self, index: usize) -> Option<Sample> {
        let value = |column: &[f64]| column.get(index).copied().filter(|&v| !is_fp_missing(v));
        Some(Sample {
            longitude: value(&self.longitudes)?,
            latitude: value(&self.latitudes)?,
            time: value(&self.times)?,
            sst: value(&self.ssts)?,
            fco2: value(&self.fco2s)?,
        })
    }

    /// Earliest and latest valid times, rounded to whole seconds.
    pub fn time_range(&self) -> Result<(i64, i64)> {
        let (min, max) = self.valid_range(&self.times, "time")?;
        Ok((min.round() as i64, max.round() as i64))
    }

    pub fn latitude_range(&self) -> Result<(f64, f64)> {
        self.valid_range(&self.latitudes, "latitude")
    }

    fn valid_range(&self, column: &[f64], name: &'static str) -> Result<(f64, f64)> {
        column
            .iter()
            .copied()
            .filter(|&v| !is_fp_missing(v))
            .fold(None, |range: Option<(f64, f64)>, v| match range {
                Some((min, max)) => Some((min.min(v), max.max(v))),
                None => Some((v, v)),
            })
            .ok_or_else(|| CrossoverError::NoValidValues {
                dataset: self.dataset_id.clone(),
                name,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsg_model::FP_MISSING_VALUE;

    fn series(times: Vec<f64>) -> CrossoverSeries {
        let n = times.len();
        CrossoverSeries::new(
            " 33ro20100105",
            [vec![1.0; n], vec![2.0; n], times, vec![20.0; n], vec![380.0; n]],
        )
        .unwrap()
    }

    #[test]
    fn dataset_ids_are_normalized() {
        let series = series(vec![0.0]);
        assert_eq!(series.dataset_id(), "33RO20100105");
        assert_eq!(series.platform_code(), "33RO");
        assert!(matches!(
            CrossoverSeries::new("33R", [vec![], vec![], vec![], vec![], vec![]]),
            Err(CrossoverError::InvalidDatasetId { .. })
        ));
    }

    #[test]
    fn ranges_skip_missing_values() {
        let series = series(vec![FP_MISSING_VALUE, 100.4, f64::NAN, 50.6]);
        assert_eq!(series.time_range().unwrap(), (51, 100));
        assert_eq!(series.sample(0), None);
        assert_eq!(series.sample(1).map(|s| s.time), Some(100.4));

        let empty = self::series(vec![FP_MISSING_VALUE]);
        assert!(matches!(
            empty.time_range(),
            Err(CrossoverError::NoValidValues { name: "time", .. })
        ));
    }

    #[test]
    fn lengths_must_agree() {
        let err = CrossoverSeries::new(
            "49P120100101",
            [vec![1.0, 2.0], vec![1.0, 2.0], vec![0.0, 1.0], vec![20.0], vec![380.0, 381.0]],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "dataset 49P120100101: SST has 1 values where 2 were expected"
        );
    }
}
