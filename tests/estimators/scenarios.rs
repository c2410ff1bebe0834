//! End-to-end scenarios with known answers.

use lcf_sim::{
    estimate_adjacent_advantage, estimate_report_probability, worker_rng, ConditionalEstimate,
    SuppressionConfig,
};

#[test]
fn zero_variance_count_below_mean_never_reported() {
    let config = SuppressionConfig::new(1.5, 4.0, 0.0).unwrap();
    let mut rng = worker_rng(1, 0);
    let result = estimate_report_probability(3, &config, 1000, &mut rng).unwrap();
    assert_eq!(result.report_probability, 0.0);
    assert_eq!(result.trials, 1000);
}

#[test]
fn zero_variance_count_above_mean_always_reported() {
    let config = SuppressionConfig::new(1.5, 4.0, 0.0).unwrap();
    let mut rng = worker_rng(1, 0);
    let result = estimate_report_probability(5, &config, 1000, &mut rng).unwrap();
    assert_eq!(result.report_probability, 1.0);
    assert_eq!(result.reported, 1000);
}

#[test]
fn adjacent_pair_around_mean_is_genuinely_uncertain() {
    let config = SuppressionConfig::new(1.5, 4.0, 1.0).unwrap();
    let mut rng = worker_rng(2, 0);
    let result = estimate_adjacent_advantage(3, &config, 100_000, &mut rng).unwrap();

    assert_eq!(result.num_suppressed + result.num_reported, 100_000);
    assert!(result.prob_n_given_suppressed > 0.0 && result.prob_n_given_suppressed < 1.0);
    match result.prob_n_plus_1_given_reported {
        ConditionalEstimate::Observed(p) => assert!(p > 0.0 && p < 1.0),
        ConditionalEstimate::InsufficientSamples => panic!("expected reported trials"),
    }
    assert!(!result.report_rate.is_below_resolution());
}

#[test]
fn adjacent_pair_matches_analytic_probabilities() {
    // Threshold ~ N(4, 1) clamped to [1.5, 6.5]; strict comparison.
    // P(report | 3) = P(T <= 3) = Phi(-1) ~ 0.1587
    // P(report | 4) = P(T <= 4) = 0.5
    // P(4 | reported) = 0.5 / (0.1587 + 0.5) ~ 0.759
    // P(3 | suppressed) = 0.8413 / (0.8413 + 0.5) ~ 0.627
    let config = SuppressionConfig::new(1.5, 4.0, 1.0).unwrap();
    let mut rng = worker_rng(3, 0);
    let result = estimate_adjacent_advantage(3, &config, 200_000, &mut rng).unwrap();

    assert!((result.prob_n_given_suppressed - 0.627).abs() < 0.01);
    assert!((result.prob_n_plus_1_given_reported.value() - 0.759).abs() < 0.01);
    let rate = result.report_rate.fraction().unwrap();
    assert!((rate - 0.329).abs() < 0.01, "report rate {}", rate);
}

#[test]
fn original_grid_one_vs_two_at_tight_config() {
    // (3.0, 0.5): counts 1 and 2 sit well below the mean; reports are rare
    let config = SuppressionConfig::new(1.5, 3.0, 0.5).unwrap();
    let mut rng = worker_rng(4, 0);
    let result = estimate_adjacent_advantage(1, &config, 100_000, &mut rng).unwrap();

    // Count 1 is always below the 1.5 floor, so every report is a 2
    assert_eq!(result.prob_n_plus_1_given_reported.value(), 1.0);
    // P(report | 2) = Phi(-2) ~ 0.0228, so P(1 | suppressed) = 1 / (2 - 0.0228) ~ 0.506
    assert!((result.prob_n_given_suppressed - 0.506).abs() < 0.01);
}
