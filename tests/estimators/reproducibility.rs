//! Seeded runs must reproduce bit-for-bit.

use lcf_sim::{
    estimate_adjacent_advantage, estimate_adjacent_advantage_parallel,
    estimate_report_probability, estimate_report_probability_parallel, worker_rng,
    EstimatorConfig, SuppressionConfig,
};

#[test]
fn sequential_runs_with_same_seed_are_identical() {
    let config = SuppressionConfig::new(1.5, 5.0, 1.0).unwrap();
    let a = estimate_adjacent_advantage(4, &config, 10_000, &mut worker_rng(99, 0)).unwrap();
    let b = estimate_adjacent_advantage(4, &config, 10_000, &mut worker_rng(99, 0)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn parallel_runs_with_same_seed_are_identical() {
    let config = SuppressionConfig::new(1.5, 6.0, 2.0).unwrap();
    let estimator = EstimatorConfig::default().trials(30_000).seed(5);
    let a = estimate_adjacent_advantage_parallel(2, &config, &estimator).unwrap();
    let b = estimate_adjacent_advantage_parallel(2, &config, &estimator).unwrap();
    assert_eq!(a, b);

    let a = estimate_report_probability_parallel(6, &config, &estimator).unwrap();
    let b = estimate_report_probability_parallel(6, &config, &estimator).unwrap();
    assert_eq!(a, b);
}

#[test]
fn different_seeds_give_different_tallies() {
    let config = SuppressionConfig::new(1.5, 4.0, 1.0).unwrap();
    let a = estimate_report_probability(4, &config, 10_000, &mut worker_rng(1, 0)).unwrap();
    let b = estimate_report_probability(4, &config, 10_000, &mut worker_rng(2, 0)).unwrap();
    assert_ne!(a.reported, b.reported);
}

#[test]
fn single_chunk_parallel_matches_sequential_stream() {
    // With one chunk the parallel path uses stream 0 of the base seed
    let config = SuppressionConfig::new(1.5, 4.0, 1.0).unwrap();
    let estimator = EstimatorConfig::default().trials(5_000).seed(17).parallel_chunks(1);
    let parallel = estimate_report_probability_parallel(4, &config, &estimator).unwrap();
    let sequential =
        estimate_report_probability(4, &config, 5_000, &mut worker_rng(17, 0)).unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn parallel_and_sequential_agree_statistically() {
    let config = SuppressionConfig::new(1.5, 5.0, 1.5).unwrap();
    let estimator = EstimatorConfig::default().trials(100_000).seed(8);
    let parallel = estimate_report_probability_parallel(5, &config, &estimator).unwrap();
    let sequential =
        estimate_report_probability(5, &config, 100_000, &mut worker_rng(1234, 0)).unwrap();
    assert!((parallel.report_probability - sequential.report_probability).abs() < 0.015);
}
