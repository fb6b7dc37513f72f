//! The crossover search.

use std::fmt;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::error::Result;
use crate::limits::CrossoverLimits;
use crate::series::{CrossoverSeries, Sample};

/// The closest pair of samples of two datasets within the limits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Crossover {
    pub dataset_ids: [String; 2],
    /// Combined space-time distance of the pair, in km.
    pub min_distance: f64,
    /// 1-based row numbers of the pair.
    pub row_numbers: [usize; 2],
    pub longitudes: [f64; 2],
    pub latitudes: [f64; 2],
    /// Sample times of the pair, rounded to whole seconds.
    pub times: [i64; 2],
    /// Earliest valid sample time of each dataset.
    pub min_times: [i64; 2],
    /// Latest valid sample time of each dataset.
    pub max_times: [i64; 2],
}

impl fmt::Display for Crossover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} row {} and {} row {}: {:.2} km",
            self.dataset_ids[0],
            self.row_numbers[0],
            self.dataset_ids[1],
            self.row_numbers[1],
            self.min_distance
        )
    }
}

/// Looks for a crossover between two datasets.
///
/// Datasets from the same platform never cross over. Datasets whose time
/// or latitude ranges are too far apart are rejected without comparing
/// samples. Fails only if a dataset has no valid times or latitudes.
pub fn find_crossover(
    first: &CrossoverSeries,
    second: &CrossoverSeries,
    limits: &CrossoverLimits,
) -> Result<Option<Crossover>> {
    if first.platform_code() == second.platform_code() {
        trace!(
            first = first.dataset_id(),
            second = second.dataset_id(),
            "same platform"
        );
        return Ok(None);
    }

    let max_time_diff = limits.max_time_diff();
    let (min_time1, max_time1) = first.time_range()?;
    let (min_time2, max_time2) = second.time_range()?;
    if (max_time1 as f64) + max_time_diff < min_time2 as f64
        || (max_time2 as f64) + max_time_diff < min_time1 as f64
    {
        return Ok(None);
    }
    let max_lat_diff = limits.max_lat_diff();
    let (min_lat1, max_lat1) = first.latitude_range()?;
    let (min_lat2, max_lat2) = second.latitude_range()?;
    if max_lat1 + max_lat_diff < min_lat2 || max_lat2 + max_lat_diff < min_lat1 {
        return Ok(None);
    }

    let Some(pair) = closest_pair(first, second, limits) else {
        return Ok(None);
    };
    let [sample1, sample2] = pair.samples;
    Ok(Some(Crossover {
        dataset_ids: [first.dataset_id().to_string(), second.dataset_id().to_string()],
        min_distance: pair.distance,
        row_numbers: pair.rows.map(|row| row + 1),
        longitudes: [sample1.longitude, sample2.longitude],
        latitudes: [sample1.latitude, sample2.latitude],
        times: [sample1.time.round() as i64, sample2.time.round() as i64],
        min_times: [min_time1, min_time2],
        max_times: [max_time1, max_time2],
    }))
}

struct Pair {
    distance: f64,
    /// 0-based.
    rows: [usize; 2],
    samples: [Sample; 2],
}

/// The closest complete pair strictly within the maximum distance; the
/// first pair found wins ties.
fn closest_pair(
    first: &CrossoverSeries,
    second: &CrossoverSeries,
    limits: &CrossoverLimits,
) -> Option<Pair> {
    let max_time_diff = limits.max_time_diff();
    let max_lat_diff = limits.max_lat_diff();
    let mut min_distance = limits.max_distance;
    let mut closest = None;
    for j in 0..first.len() {
        let Some(a) = first.sample(j) else {
            continue;
        };
        for k in 0..second.len() {
            let Some(b) = second.sample(k) else {
                continue;
            };
            // The second series is in time order.
            if b.time > a.time + max_time_diff {
                break;
            }
            if b.time < a.time - max_time_diff {
                continue;
            }
            if (b.sst - a.sst).abs() > limits.max_temp_diff
                || (b.fco2 - a.fco2).abs() > limits.max_fco2_diff
                || (b.latitude - a.latitude).abs() > max_lat_diff
            {
                continue;
            }
            let distance = limits.distance(
                (a.longitude, a.latitude, a.time),
                (b.longitude, b.latitude, b.time),
            );
            if distance < min_distance {
                min_distance = distance;
                closest = Some(Pair {
                    distance,
                    rows: [j, k],
                    samples: [a, b],
                });
            }
        }
    }
    closest
}

/// Checks one dataset against many, in order.
pub fn find_crossovers<'a>(
    primary: &CrossoverSeries,
    others: impl IntoIterator<Item = &'a CrossoverSeries>,
    limits: &CrossoverLimits,
) -> Result<Vec<Crossover>> {
    let start = Instant::now();
    let mut checked = 0;
    let mut crossovers = Vec::new();
    for other in others {
        checked += 1;
        match find_crossover(primary, other, limits)? {
            Some(crossover) => {
                debug!(%crossover, "crossover found");
                crossovers.push(crossover);
            }
            None => trace!(other = other.dataset_id(), "no crossover"),
        }
    }
    info!(
        dataset = primary.dataset_id(),
        checked,
        crossovers = crossovers.len(),
        duration_ms = start.elapsed().as_millis(),
        "crossover search finished"
    );
    Ok(crossovers)
}
