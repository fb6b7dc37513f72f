//! Property tests for tolerances and bounds classification.

use dsg_model::{
    BoundsViolation, DataKind, DataType, DataValue, MAX_ABSOLUTE_ERROR, MAX_RELATIVE_ERROR,
    Severity, close_to, longitude_close_to,
};
use proptest::prelude::*;

fn bounded(b: [f64; 4]) -> DataType {
    DataType::builder("value", DataKind::Double, 1.0)
        .numeric_bounds(Some(b[0]), Some(b[1]), Some(b[2]), Some(b[3]))
        .build()
        .expect("valid bounds")
}

fn rank(violation: Option<BoundsViolation>) -> i32 {
    match violation {
        Some(BoundsViolation::UnreasonablySmall) => -2,
        Some(BoundsViolation::QuestionablySmall) => -1,
        None => 0,
        Some(BoundsViolation::QuestionablyLarge) => 1,
        Some(BoundsViolation::UnreasonablyLarge) => 2,
    }
}

proptest! {
    #[test]
    fn close_to_is_reflexive(x in proptest::num::f64::ANY) {
        prop_assert!(close_to(x, x, 0.0, 0.0));
    }

    #[test]
    fn close_to_is_symmetric(a in -1.0e6f64..1.0e6, b in -1.0e6f64..1.0e6) {
        prop_assert_eq!(
            close_to(a, b, MAX_RELATIVE_ERROR, MAX_ABSOLUTE_ERROR),
            close_to(b, a, MAX_RELATIVE_ERROR, MAX_ABSOLUTE_ERROR)
        );
    }

    #[test]
    fn longitude_matches_modulo_360(lon in -180.0f64..180.0) {
        prop_assert!(longitude_close_to(lon, lon + 360.0, 0.0, 1.0e-6));
    }

    #[test]
    fn bounds_classification_is_monotonic(
        start in -1000.0f64..1000.0,
        gaps in proptest::array::uniform3(0.5f64..100.0),
        x in -2000.0f64..2000.0,
        dx in 0.0f64..500.0,
    ) {
        let b = [start, start + gaps[0], start + gaps[0] + gaps[1], start + gaps[0] + gaps[1] + gaps[2]];
        let dtype = bounded(b);
        let low = rank(dtype.bounds_violation(&DataValue::Double(x)));
        let high = rank(dtype.bounds_violation(&DataValue::Double(x + dx)));
        // Moving up never goes from "too large" back to "too small".
        if low > 0 {
            prop_assert!(high >= low);
        }
        if high < 0 {
            prop_assert!(low <= high);
        }
    }
}

#[test]
fn bounds_on_edges_are_acceptable() {
    let dtype = bounded([0.0, 80.0, 1200.0, 50000.0]);
    for edge in [0.0, 80.0, 1200.0, 50000.0] {
        let msg = dtype.bounds_check(Some(&DataValue::Double(edge)));
        assert!(msg.is_none() || msg.unwrap().severity == Severity::Warning);
    }
    assert!(dtype.bounds_check(Some(&DataValue::Double(500.0))).is_none());
    assert_eq!(
        dtype
            .bounds_check(Some(&DataValue::Double(-1.0)))
            .map(|msg| msg.severity),
        Some(Severity::Error)
    );
}
