//! Tolerances deciding whether two samples measured the same water.

use std::f64::consts::PI;

use dsg_model::EARTH_AUTHALIC_RADIUS;
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossoverLimits {
    /// Assumed drift of surface water, in km/day; converts a time
    /// difference into a distance.
    pub seawater_speed: f64,
    /// Largest combined space-time distance, in km.
    pub max_distance: f64,
    /// Largest fCO2 difference, in µatm.
    pub max_fco2_diff: f64,
    /// Largest sea surface temperature difference, in °C.
    pub max_temp_diff: f64,
}

impl Default for CrossoverLimits {
    fn default() -> Self {
        Self {
            seawater_speed: 30.0,
            max_distance: 80.0,
            max_fco2_diff: 5.0,
            max_temp_diff: 0.3,
        }
    }
}

impl CrossoverLimits {
    /// Time, in whole seconds, for the water to drift the maximum distance.
    pub fn max_time_diff(&self) -> f64 {
        (SECONDS_PER_DAY * self.max_distance / self.seawater_speed).ceil()
    }

    /// Latitude span, in degrees, of the maximum distance.
    pub fn max_lat_diff(&self) -> f64 {
        (self.max_distance / EARTH_AUTHALIC_RADIUS) * (180.0 / PI)
    }

    /// Combined distance of two samples: the great-circle distance and the
    /// drift distance of their time difference, added in quadrature.
    pub fn distance(&self, first: (f64, f64, f64), second: (f64, f64, f64)) -> f64 {
        let (lon1, lat1, time1) = first;
        let (lon2, lat2, time2) = second;
        let surface = dsg_model::haversine_km(lon1, lat1, lon2, lat2);
        let drift = (time2 - time1) / SECONDS_PER_DAY * self.seawater_speed;
        surface.hypot(drift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_limits() {
        let limits = CrossoverLimits::default();
        assert_eq!(limits.max_time_diff(), 230_400.0);
        assert!((limits.max_lat_diff() - 0.719_46).abs() < 1e-5);
    }

    #[test]
    fn drift_counts_as_distance() {
        let limits = CrossoverLimits::default();
        // Same place, one day apart.
        let dist = limits.distance((10.0, 20.0, 0.0), (10.0, 20.0, 86_400.0));
        assert!((dist - 30.0).abs() < 1e-9);
        // 3-4-5 triangle: 40 km apart and one day of drift.
        let one_degree = dsg_model::haversine_km(0.0, 0.0, 0.0, 1.0);
        let north = 40.0 / one_degree;
        let dist = limits.distance((0.0, 0.0, 0.0), (0.0, north, 86_400.0));
        assert!((dist - 50.0).abs() < 1e-6, "{dist}");
    }
}
