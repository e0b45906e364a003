//! Property tests for the variance calculation and threshold checks

use flight_health_core::health::{evaluate_battery, evaluate_prop_test, variance, PropTestVerdict};
use proptest::prelude::*;

/// Two-pass reference in f64: N times the population variance
fn reference_variance(values: &[f32]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    values.iter().map(|&v| (v as f64 - mean).powi(2)).sum()
}

fn sum_of_squares(values: &[f32]) -> f64 {
    values.iter().map(|&v| (v as f64).powi(2)).sum()
}

/// Accelerometer-like values in g
fn sample_strategy() -> impl Strategy<Value = f32> {
    -4.0f32..4.0f32
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_variance_matches_reference(values in prop::collection::vec(sample_strategy(), 1..=100)) {
        let got = variance(&values) as f64;
        let expected = reference_variance(&values);
        let tolerance = 1e-3 * (1.0 + sum_of_squares(&values));

        prop_assert!(
            (got - expected).abs() <= tolerance,
            "variance {} vs reference {} (tol {})", got, expected, tolerance
        );
    }

    #[test]
    fn prop_variance_of_constant_is_zero(value in sample_strategy(), len in 1usize..=100) {
        let values = vec![value; len];
        let tolerance = 1e-3 * (1.0 + sum_of_squares(&values));

        prop_assert!((variance(&values) as f64).abs() <= tolerance);
    }

    #[test]
    fn prop_single_value_variance_is_exactly_zero(value in sample_strategy()) {
        prop_assert_eq!(variance(&[value]), 0.0);
    }

    #[test]
    fn prop_variance_is_not_meaningfully_negative(values in prop::collection::vec(sample_strategy(), 1..=100)) {
        let tolerance = 1e-3 * (1.0 + sum_of_squares(&values));
        prop_assert!(variance(&values) as f64 >= -tolerance);
    }

    #[test]
    fn prop_threshold_is_open_interval(threshold in 0.001f32..100.0, value in -10.0f32..200.0) {
        let verdict = evaluate_prop_test(0.0, threshold, value);
        let inside = value > 0.0 && value < threshold;

        prop_assert_eq!(verdict.is_pass(), inside);
        prop_assert_ne!(verdict, PropTestVerdict::NoThreshold);
    }

    #[test]
    fn prop_zero_threshold_always_passes(value in -10.0f32..200.0) {
        prop_assert_eq!(evaluate_prop_test(0.0, 0.0, value), PropTestVerdict::NoThreshold);
    }

    #[test]
    fn prop_battery_passes_iff_sag_within_threshold(
        idle in 3.0f32..4.35,
        drop in 0.0f32..2.0,
        threshold in 0.1f32..1.5,
    ) {
        let loaded = idle - drop;
        let verdict = evaluate_battery(idle, loaded, threshold);

        prop_assert_eq!(verdict.sag, idle - loaded);
        prop_assert_eq!(verdict.pass, verdict.sag <= threshold);
    }
}
