//! Geographic helpers shared by the checks and the crossover search.

/// Authalic radius of the earth in kilometers.
pub const EARTH_AUTHALIC_RADIUS: f64 = 6371.007;

/// Kilometers per hour to knots.
pub const KM_PER_HOUR_TO_KNOTS: f64 = 0.539957;

/// Longitudes up to this magnitude are folded into (-180, 180].
pub const MAX_FOLDABLE_LONGITUDE: f64 = 540.0;

/// Great-circle distance in kilometers using the haversine formula.
pub fn haversine_km(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let half_dlat = (lat2 - lat1) * 0.5;
    let half_dlon = (lon2 - lon1).to_radians() * 0.5;
    let sin_lat = half_dlat.sin();
    let sin_lon = half_dlon.sin();
    let a = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lon * sin_lon;
    2.0 * a.sqrt().min(1.0).asin() * EARTH_AUTHALIC_RADIUS
}

/// Folds a longitude into (-180, 180].
///
/// Values with a magnitude above [`MAX_FOLDABLE_LONGITUDE`] are returned
/// unchanged so that absurd input stays visible to the bounds check.
pub fn fold_longitude(longitude: f64) -> f64 {
    if !longitude.is_finite() || longitude.abs() > MAX_FOLDABLE_LONGITUDE {
        return longitude;
    }
    let mut folded = longitude;
    while folded <= -180.0 {
        folded += 360.0;
    }
    while folded > 180.0 {
        folded -= 360.0;
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn haversine_known_distance() {
        // One degree of latitude along a meridian.
        let dist = haversine_km(0.0, 0.0, 0.0, 1.0);
        assert!((dist - 111.195).abs() < 0.01, "{dist}");
        assert!(haversine_km(12.5, -40.0, 12.5, -40.0).abs() < 1e-9);
    }

    #[test]
    fn haversine_across_seam() {
        let dist = haversine_km(179.5, 0.0, -179.5, 0.0);
        assert!((dist - 111.195).abs() < 0.01, "{dist}");
    }

    #[test]
    fn fold_examples() {
        assert_eq!(fold_longitude(180.0), 180.0);
        assert_eq!(fold_longitude(-180.0), 180.0);
        assert_eq!(fold_longitude(270.0), -90.0);
        assert_eq!(fold_longitude(-450.0), -90.0);
        assert_eq!(fold_longitude(9999.0), 9999.0);
    }

    proptest! {
        #[test]
        fn fold_lands_in_range(lon in -540.0f64..=540.0) {
            let folded = fold_longitude(lon);
            prop_assert!(folded > -180.0 && folded <= 180.0);
            let turns = (lon - folded) / 360.0;
            prop_assert!((turns - turns.round()).abs() < 1e-9);
        }

        #[test]
        fn fold_passes_absurd_values(lon in 540.0001f64..1.0e6) {
            prop_assert_eq!(fold_longitude(lon), lon);
            prop_assert_eq!(fold_longitude(-lon), -lon);
        }
    }
}
