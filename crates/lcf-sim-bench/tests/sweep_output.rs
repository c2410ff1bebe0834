//! End-to-end sweep tests: grid file in, reports out.

use std::fs;

use lcf_sim::Comparator;
use lcf_sim_bench::output::{
    to_markdown, write_adjacency_csv, write_frequency_csv, ADJACENCY_CSV_HEADER,
    FREQUENCY_CSV_HEADER,
};
use lcf_sim_bench::{GridPoint, SweepConfig, SweepError, SweepPreset, SweepRunner};

#[test]
fn grid_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.json");
    fs::write(
        &path,
        r#"{
            "preset": "custom",
            "grid": [
                { "lower_bound": 1.5, "mean": 4.0, "standard_deviation": 1.0 },
                { "lower_bound": 2.0, "mean": 5.0, "standard_deviation": 0.5 }
            ],
            "counts": [2, 4, 6],
            "trials": 2000,
            "comparator": "non-strict"
        }"#,
    )
    .unwrap();

    let config = SweepConfig::from_json_file(&path).unwrap();
    assert_eq!(config.preset, SweepPreset::Custom);
    assert_eq!(config.grid.len(), 2);
    assert_eq!(config.counts, vec![2, 4, 6]);
    // Missing fields fall back to the full preset
    assert_eq!(config.adjacent_n, vec![1, 2]);
    assert_eq!(config.comparator, Comparator::NonStrict);
}

#[test]
fn malformed_grid_file_is_a_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        SweepConfig::from_json_file(&path),
        Err(SweepError::Json(_))
    ));
}

#[test]
fn missing_grid_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = SweepConfig::from_json_file(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(SweepError::Io { .. })));
}

#[test]
fn sweep_writes_csv_rows_for_every_item() {
    let config = SweepConfig {
        preset: SweepPreset::Custom,
        grid: vec![
            GridPoint::new(1.5, 3.0, 0.5),
            GridPoint::new(1.5, 5.0, 1.0),
            GridPoint::new(1.5, 1.0, 1.0), // mean below lower bound
        ],
        counts: (1..=6).collect(),
        adjacent_n: vec![1, 2],
        trials: 5_000,
        seed: 99,
        comparator: Comparator::Strict,
    };
    let results = SweepRunner::new().run(&config, |_, _| {}).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let frequency_path = dir.path().join("frequency.csv");
    let adjacency_path = dir.path().join("adjacency.csv");
    write_frequency_csv(&results, &frequency_path).unwrap();
    write_adjacency_csv(&results, &adjacency_path).unwrap();

    let frequency = fs::read_to_string(&frequency_path).unwrap();
    let lines: Vec<&str> = frequency.lines().collect();
    assert_eq!(lines[0], FREQUENCY_CSV_HEADER);
    assert_eq!(lines.len(), 1 + 3 * 6);
    assert!(lines.iter().skip(1).take(12).all(|l| l.ends_with(',')));
    assert!(lines.iter().skip(13).all(|l| l.contains("invalid configuration")));

    let adjacency = fs::read_to_string(&adjacency_path).unwrap();
    let lines: Vec<&str> = adjacency.lines().collect();
    assert_eq!(lines[0], ADJACENCY_CSV_HEADER);
    assert_eq!(lines.len(), 1 + 3 * 2);

    let md = to_markdown(&results);
    assert!(md.contains("## Adjacent Counts 1 and 2"));
    assert!(md.contains("## Adjacent Counts 2 and 3"));
    assert!(md.contains("## Failed Estimates"));
}

#[test]
fn empty_grid_is_rejected_before_running() {
    let config = SweepConfig {
        grid: Vec::new(),
        ..SweepConfig::quick()
    };
    let result = SweepRunner::new().run(&config, |_, _| {});
    assert!(matches!(result, Err(SweepError::InvalidSweep(_))));
}
