//! Statistical properties of the estimators.

use lcf_sim::{
    estimate_adjacent_advantage, estimate_report_probability, worker_rng, LcfError,
    SuppressionConfig,
};
use proptest::prelude::*;

#[test]
fn count_below_lower_bound_is_never_reported() {
    let config = SuppressionConfig::new(1.5, 5.0, 1.5).unwrap();
    let mut rng = worker_rng(10, 0);
    for count in [0, 1] {
        let result = estimate_report_probability(count, &config, 20_000, &mut rng).unwrap();
        assert_eq!(result.report_probability, 0.0, "count {}", count);
    }
}

#[test]
fn count_at_or_above_upper_bound_is_always_reported() {
    let config = SuppressionConfig::new(1.5, 5.0, 1.5).unwrap();
    let mut rng = worker_rng(11, 0);
    // upper bound 8.5
    for count in [9, 10, 50] {
        let result = estimate_report_probability(count, &config, 20_000, &mut rng).unwrap();
        assert_eq!(result.report_probability, 1.0, "count {}", count);
    }
}

#[test]
fn report_probability_is_monotone_in_count() {
    let config = SuppressionConfig::new(1.5, 5.0, 1.0).unwrap();
    let mut rng = worker_rng(12, 0);
    let probabilities: Vec<f64> = (0..=10)
        .map(|count| {
            estimate_report_probability(count, &config, 50_000, &mut rng)
                .unwrap()
                .report_probability
        })
        .collect();

    for pair in probabilities.windows(2) {
        // Allow sampling noise of a few standard errors
        assert!(pair[1] >= pair[0] - 0.01, "not monotone: {:?}", probabilities);
    }
    assert_eq!(probabilities[0], 0.0);
    assert_eq!(probabilities[10], 1.0);
}

#[test]
fn invalid_configurations_name_the_parameter() {
    let cases = [
        (SuppressionConfig::new(1.5, 4.0, -1.0), "standard_deviation"),
        (SuppressionConfig::new(4.0, 1.5, 1.0), "mean"),
        (SuppressionConfig::new(-0.5, 1.5, 1.0), "lower_bound"),
    ];
    for (result, parameter) in cases {
        match result {
            Err(LcfError::InvalidConfiguration { parameter: p, .. }) => assert_eq!(p, parameter),
            other => panic!("expected invalid {}, got {:?}", parameter, other),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every adjacency run accounts for every trial exactly once
    #[test]
    fn prop_adjacency_conserves_trials(
        mean in 1.5f64..8.0,
        sd in 0.0f64..2.0,
        n in 0u64..10,
        trials in 1u64..2_000,
        seed in any::<u64>(),
    ) {
        let config = SuppressionConfig::new(1.5, mean, sd).unwrap();
        let mut rng = worker_rng(seed, 0);
        match estimate_adjacent_advantage(n, &config, trials, &mut rng) {
            Ok(result) => {
                prop_assert_eq!(result.num_suppressed + result.num_reported, trials);
                prop_assert!((0.0..=1.0).contains(&result.prob_n_given_suppressed));
                prop_assert!((0.0..=1.0).contains(&result.prob_n_plus_1_given_reported.value()));
                prop_assert_eq!(result.report_rate.is_below_resolution(), result.num_reported == 0);
            }
            Err(LcfError::NoSuppressedTrials { trials: t, .. }) => prop_assert_eq!(t, trials),
            Err(e) => prop_assert!(false, "unexpected error {}", e),
        }
    }

    /// Report probability is a proportion of the trials run
    #[test]
    fn prop_report_probability_in_unit_interval(
        mean in 1.5f64..8.0,
        sd in 0.0f64..2.0,
        count in 0u64..12,
        trials in 1u64..2_000,
        seed in any::<u64>(),
    ) {
        let config = SuppressionConfig::new(1.5, mean, sd).unwrap();
        let mut rng = worker_rng(seed, 0);
        let result = estimate_report_probability(count, &config, trials, &mut rng).unwrap();
        prop_assert!(result.reported <= trials);
        prop_assert!((0.0..=1.0).contains(&result.report_probability));
    }
}
