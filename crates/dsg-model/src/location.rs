use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A sample position in space and time, optionally carrying a data value.
///
/// Ordered by time, longitude, latitude, depth, data value and finally
/// row number. Floats compare with `total_cmp`, so the order is total and
/// locations can live in a `BTreeSet`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DataLocation {
    /// 1-based row number; `None` until matched against a data row.
    pub row_number: Option<usize>,
    pub longitude: f64,
    pub latitude: f64,
    /// Seconds since 1970-01-01T00:00:00Z.
    pub time: f64,
    pub depth: Option<f64>,
    pub data_value: Option<f64>,
}

impl DataLocation {
    pub fn new(longitude: f64, latitude: f64, time: f64) -> Self {
        Self {
            longitude,
            latitude,
            time,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_row(mut self, row_number: usize) -> Self {
        self.row_number = Some(row_number);
        self
    }

    #[must_use]
    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = Some(depth);
        self
    }

    #[must_use]
    pub fn with_data_value(mut self, value: f64) -> Self {
        self.data_value = Some(value);
        self
    }
}

fn cmp_optional(first: Option<f64>, second: Option<f64>) -> Ordering {
    match (first, second) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.total_cmp(&b),
    }
}

impl Ord for DataLocation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.longitude.total_cmp(&other.longitude))
            .then_with(|| self.latitude.total_cmp(&other.latitude))
            .then_with(|| cmp_optional(self.depth, other.depth))
            .then_with(|| cmp_optional(self.data_value, other.data_value))
            .then_with(|| self.row_number.cmp(&other.row_number))
    }
}

impl PartialOrd for DataLocation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for DataLocation {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DataLocation {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn orders_by_time_then_position_then_row() {
        let mut set = BTreeSet::new();
        set.insert(DataLocation::new(10.0, 5.0, 200.0).with_row(1));
        set.insert(DataLocation::new(10.0, 5.0, 100.0).with_row(2));
        set.insert(DataLocation::new(9.0, 5.0, 200.0).with_row(3));
        set.insert(DataLocation::new(9.0, 5.0, 200.0).with_row(4));
        let rows: Vec<_> = set.iter().filter_map(|loc| loc.row_number).collect();
        assert_eq!(rows, vec![2, 3, 4, 1]);
    }

    #[test]
    fn nan_is_ordered() {
        let a = DataLocation::new(f64::NAN, 0.0, 0.0);
        assert_eq!(a.cmp(&a), Ordering::Equal);
    }
}
