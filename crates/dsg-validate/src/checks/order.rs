//! Time order of the samples and the ship speed between them.
//!
//! Samples are sorted by time and the row numbers are walked both from
//! the first row forward and from the last row backward. Rows that are
//! out of place in a walk are misordered; consecutive in-place rows are
//! checked for an implausible speed. The walk with fewer problems is
//! reported, preferring the forward walk on a tie.

use std::collections::BTreeSet;

use dsg_core::{StandardizeOptions, StdUserDataArray};
use dsg_model::{DataLocation, Diagnostic, KM_PER_HOUR_TO_KNOTS, Severity, haversine_km};
use dsg_standards::names;
use tracing::debug;

use super::{header, usable_column};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// A speed problem found while arriving at `position`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SpeedProblem {
    position: usize,
    severity: Severity,
    limit: f64,
    speed: f64,
}

#[derive(Debug, Default)]
struct Walk {
    misordered: BTreeSet<usize>,
    speeds: Vec<SpeedProblem>,
}

impl Walk {
    fn problem_count(&self) -> usize {
        self.misordered.len() + self.speeds.len()
    }
}

struct Track<'a> {
    longitudes: &'a [Option<f64>],
    latitudes: &'a [Option<f64>],
    times: &'a [Option<f64>],
    warning_knots: f64,
    error_knots: f64,
}

impl Track<'_> {
    /// Speed from the sample at 1-based `from` to the one at `to`.
    fn speed_problem(&self, from: usize, to: usize) -> Option<SpeedProblem> {
        let point = |position: usize| {
            let index = position - 1;
            Some((
                self.longitudes[index]?,
                self.latitudes[index]?,
                self.times[index]?,
            ))
        };
        let (lon1, lat1, time1) = point(from)?;
        let (lon2, lat2, time2) = point(to)?;
        let km = haversine_km(lon1, lat1, lon2, lat2);
        let hours = (time2 - time1) / SECONDS_PER_HOUR;
        // 0/0 is NaN, which exceeds no limit.
        let speed = KM_PER_HOUR_TO_KNOTS * km / hours;
        let (severity, limit) = if speed > self.error_knots {
            (Severity::Error, self.error_knots)
        } else if speed > self.warning_knots {
            (Severity::Warning, self.warning_knots)
        } else {
            return None;
        };
        Some(SpeedProblem {
            position: to,
            severity,
            limit,
            speed,
        })
    }

    fn forward(&self, sorted: &[usize]) -> Walk {
        let mut walk = Walk::default();
        let mut expected = 1;
        let mut last = None;
        for &actual in sorted {
            while expected < actual {
                walk.misordered.insert(expected);
                expected += 1;
            }
            if expected != actual {
                continue;
            }
            if let Some(previous) = last {
                walk.speeds.extend(self.speed_problem(previous, actual));
            }
            last = Some(actual);
            expected += 1;
        }
        walk
    }

    fn backward(&self, sorted: &[usize], num_samples: usize) -> Walk {
        let mut walk = Walk::default();
        let mut expected = num_samples;
        let mut last = None;
        for &actual in sorted.iter().rev() {
            while expected > actual {
                walk.misordered.insert(expected);
                expected -= 1;
            }
            if expected != actual {
                continue;
            }
            if let Some(previous) = last {
                walk.speeds.extend(
                    self.speed_problem(actual, previous)
                        .map(|problem| SpeedProblem {
                            position: actual,
                            ..problem
                        }),
                );
            }
            last = Some(actual);
            expected = expected.saturating_sub(1);
        }
        walk
    }
}

pub fn check(data: &StdUserDataArray, options: &StandardizeOptions) -> Vec<Diagnostic> {
    let array = data.array();
    let (Some(lon_col), Some(lat_col)) = (
        usable_column(data, names::LONGITUDE),
        usable_column(data, names::LATITUDE),
    ) else {
        return Vec::new();
    };
    let time_columns = data.time_columns();
    if time_columns.is_empty() {
        return Vec::new();
    }
    let (Some(longitudes), Some(latitudes)) = (array.sample_longitudes(), array.sample_latitudes())
    else {
        return Vec::new();
    };
    let times = data.sample_times();

    let mut located = BTreeSet::new();
    for (index, time) in times.iter().enumerate() {
        let (Some(time), Some(lon), Some(lat)) = (*time, longitudes[index], latitudes[index]) else {
            continue;
        };
        let millis = (time * 1000.0).round() / 1000.0;
        located.insert(DataLocation::new(lon, lat, millis).with_row(index + 1));
    }
    let sorted: Vec<usize> = located.iter().filter_map(|loc| loc.row_number).collect();

    let track = Track {
        longitudes: &longitudes,
        latitudes: &latitudes,
        times,
        warning_knots: options.speed_warning_knots,
        error_knots: options.speed_error_knots,
    };
    let forward = track.forward(&sorted);
    let backward = track.backward(&sorted, data.num_samples());
    debug!(
        forward = forward.problem_count(),
        backward = backward.problem_count(),
        "time order walks"
    );
    let walk = if backward.problem_count() < forward.problem_count() {
        backward
    } else {
        forward
    };

    let mut diagnostics = Vec::new();
    for &position in &walk.misordered {
        let row_number = data.row_number(position - 1);
        for &col in &time_columns {
            diagnostics.push(
                Diagnostic::new(Severity::Critical, "time-misordered data row")
                    .at_row(row_number)
                    .at_column(col + 1, header(data, col)),
            );
        }
    }

    let speed_columns: Vec<usize> = [lon_col, lat_col]
        .into_iter()
        .chain(time_columns.iter().copied())
        .collect();
    for problem in &walk.speeds {
        let row_number = data.row_number(problem.position - 1);
        let general = format!("calculated speed exceeds {} knots", problem.limit);
        let detailed = format!(
            "calculated speed of {:.2} knots exceeds {} knots",
            problem.speed, problem.limit
        );
        for &col in &speed_columns {
            diagnostics.push(
                Diagnostic::new(problem.severity, general.clone())
                    .with_detail(detailed.clone())
                    .at_row(row_number)
                    .at_column(col + 1, header(data, col)),
            );
        }
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track<'a>(
        longitudes: &'a [Option<f64>],
        latitudes: &'a [Option<f64>],
        times: &'a [Option<f64>],
    ) -> Track<'a> {
        Track {
            longitudes,
            latitudes,
            times,
            warning_knots: 20.0,
            error_knots: 50.0,
        }
    }

    #[test]
    fn forward_walk_marks_skipped_rows() {
        let lons = [Some(0.0); 4];
        let lats = [Some(0.0); 4];
        let times = [Some(0.0), Some(3600.0), None, Some(7200.0)];
        let track = track(&lons, &lats, &times);
        let walk = track.forward(&[1, 2, 4]);
        assert_eq!(walk.misordered.into_iter().collect::<Vec<_>>(), vec![3]);
        assert!(walk.speeds.is_empty());
    }

    #[test]
    fn swapped_rows_are_found_in_both_walks() {
        let lons = [Some(0.0); 4];
        let lats = [Some(0.0); 4];
        let times = [Some(0.0), Some(7200.0), Some(3600.0), Some(10800.0)];
        let track = track(&lons, &lats, &times);
        let sorted = [1, 3, 2, 4];
        assert_eq!(track.forward(&sorted).misordered.into_iter().collect::<Vec<_>>(), vec![2]);
        assert_eq!(track.backward(&sorted, 4).misordered.into_iter().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn speeds_are_graded() {
        // One degree of latitude is about 60 nautical miles.
        let lons = [Some(0.0), Some(0.0), Some(0.0)];
        let lats = [Some(0.0), Some(0.5), Some(1.5)];
        let times = [Some(0.0), Some(3600.0), Some(7200.0)];
        let track = track(&lons, &lats, &times);
        let walk = track.forward(&[1, 2, 3]);
        let graded: Vec<(usize, Severity)> = walk
            .speeds
            .iter()
            .map(|problem| (problem.position, problem.severity))
            .collect();
        assert_eq!(graded, vec![(2, Severity::Warning), (3, Severity::Error)]);
    }

    #[test]
    fn identical_samples_have_no_speed() {
        let lons = [Some(10.0), Some(10.0)];
        let lats = [Some(45.0), Some(45.0)];
        let times = [Some(100.0), Some(100.0)];
        assert!(track(&lons, &lats, &times).speed_problem(1, 2).is_none());
    }
}
