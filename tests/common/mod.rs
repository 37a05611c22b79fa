use approx::assert_abs_diff_eq;
use skyplan::config::{ObservationConfig, TargetLongitudes};
use skyplan::scheduler::{EphemerisRow, SchedulePlan};

/// Reference survey plan restricted to the given target longitudes.
pub fn reference_plan(targets: &[f64]) -> SchedulePlan {
    let config = ObservationConfig {
        targets: TargetLongitudes::List(targets.to_vec()),
        ..ObservationConfig::default()
    };
    config.resolve().unwrap()
}

pub fn assert_row_close(actual: &EphemerisRow, expected: &EphemerisRow, epsilon: f64) {
    assert_eq!(actual.local_date, expected.local_date);
    assert_eq!(actual.local_time, expected.local_time);
    assert_abs_diff_eq!(actual.ra, expected.ra, epsilon = epsilon);
    assert_abs_diff_eq!(actual.dec, expected.dec, epsilon = epsilon);
    assert_abs_diff_eq!(actual.alt, expected.alt, epsilon = epsilon);
    assert_abs_diff_eq!(actual.az, expected.az, epsilon = epsilon);
}
