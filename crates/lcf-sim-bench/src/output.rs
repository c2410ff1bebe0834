//! Output formatters for sweep results.
//!
//! This module provides:
//! - Markdown tables for report probability and adjacent-pair inference
//! - CSV export for both kinds of rows
//! - JSON export of the full result set

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use lcf_sim::{AdjacencyResult, ConditionalEstimate, ReportRate};
use serde_json::{json, Value};

use crate::sweep::{GridPoint, SweepResults};

/// Header for the report-probability CSV.
pub const FREQUENCY_CSV_HEADER: &str =
    "lower_bound,mean,standard_deviation,comparator,count,trials,reported,report_probability,error";

/// Header for the adjacent-pair CSV.
pub const ADJACENCY_CSV_HEADER: &str = "lower_bound,mean,standard_deviation,comparator,n,trials,num_suppressed,num_reported,prob_n_given_suppressed,prob_n_plus_1_given_reported,insufficient_samples,report_one_in,error";

/// Render the report rate as `1/k`, or `1/<trials>++` when nothing was reported.
pub fn format_report_rate(rate: &ReportRate) -> String {
    match rate {
        ReportRate::Observed { .. } => format!("1/{}", rate.one_in().unwrap_or(1)),
        ReportRate::BelowResolution { trials } => format!("1/{}++", trials),
    }
}

/// The upper count of the pair `(n, n + 1)`, as text.
///
/// `n` comes straight from the sweep configuration; the estimator rejects
/// values that overflow, but the report still names the failed pair.
pub fn upper_count_label(n: u64) -> String {
    match n.checked_add(1) {
        Some(m) => m.to_string(),
        None => format!("{}+1", n),
    }
}

/// Generate markdown report from results.
pub fn to_markdown(results: &SweepResults) -> String {
    let mut md = String::new();

    md.push_str(&format!(
        "# LCF Suppression Estimates ({})\n\n",
        results.config.preset.name()
    ));

    md.push_str("## Configuration\n\n");
    md.push_str(&format!("- **Trials per estimate**: {}\n", results.config.trials));
    md.push_str(&format!("- **Seed**: {}\n", results.config.seed));
    md.push_str(&format!(
        "- **Comparator**: {}\n",
        results.config.comparator.name()
    ));
    md.push_str(&format!(
        "- **Total execution time**: {:.1}s\n\n",
        results.total_time.as_secs_f64()
    ));

    if !results.config.counts.is_empty() {
        md.push_str("## Report Probability\n\n");
        md.push_str(&format!(
            "Given the count of distinct AIDs in a bucket, what is the probability that the bucket will be reported (not suppressed) ({}):\n\n",
            lower_bound_note(&results.config.grid)
        ));
        md.push_str(&frequency_table(results));
        md.push('\n');
    }

    for &n in &results.config.adjacent_n {
        let m = upper_count_label(n);
        md.push_str(&format!("## Adjacent Counts {} and {}\n\n", n, m));
        md.push_str(&format!(
            "Suppose that an attacker knows that there are either {n} or {m} AIDs in a bucket, each with probability 50%. The table shows:\n\
             1. The probability that there are in fact {n} AIDs given that the bucket was suppressed.\n\
             2. The probability that there are in fact {m} AIDs given that the bucket was reported.\n\
             3. The probability that the bucket was reported.\n\n",
            n = n,
            m = m
        ));
        md.push_str(&adjacency_table(results, n));
        md.push('\n');
    }

    let failures = results.failures();
    if !failures.is_empty() {
        md.push_str("## Failed Estimates\n\n");
        for (point, task, error) in failures {
            md.push_str(&format!(
                "- {} {}: {}\n",
                row_label(&results.config.grid, point),
                task,
                error
            ));
        }
        md.push('\n');
    }

    md
}

/// `lower=1.5` when the grid shares one lower bound, otherwise a note that
/// rows carry their own.
fn lower_bound_note(grid: &[GridPoint]) -> String {
    match grid.first() {
        Some(first) if grid.iter().all(|p| p.lower_bound == first.lower_bound) => {
            format!("`lower={}`", first.lower_bound)
        }
        _ => "rows labelled `(lower,mean,sd)`".to_string(),
    }
}

fn row_label(grid: &[GridPoint], point: usize) -> String {
    let p = &grid[point];
    let shared = grid.iter().all(|q| q.lower_bound == p.lower_bound);
    if shared {
        p.label()
    } else {
        format!("({},{:.1},{:?})", p.lower_bound, p.mean, p.standard_deviation)
    }
}

/// Report-probability table: one row per grid point, one column per count.
fn frequency_table(results: &SweepResults) -> String {
    let counts = &results.config.counts;
    let mut table = String::new();

    table.push_str("| Config |");
    for count in counts {
        table.push_str(&format!(" {} |", count));
    }
    table.push_str("\n|------|");
    for _ in counts {
        table.push_str("------|");
    }
    table.push('\n');

    for point in 0..results.config.grid.len() {
        table.push_str(&format!("| {} |", row_label(&results.config.grid, point)));
        for &count in counts {
            match results.frequency_for(point, count).map(|r| &r.outcome) {
                Some(Ok(r)) => table.push_str(&format!(" {:.4} |", r.report_probability)),
                Some(Err(_)) => table.push_str(" error |"),
                None => table.push_str(" - |"),
            }
        }
        table.push('\n');
    }

    table
}

/// Adjacent-pair table for counts `(n, n + 1)`.
fn adjacency_table(results: &SweepResults, n: u64) -> String {
    let mut table = String::new();

    table.push_str(&format!(
        "| Config | Prob {} AIDs (suppressed) | Prob {} AIDs (reported) | Prob reported |\n",
        n,
        upper_count_label(n)
    ));
    table.push_str("|------|------|------|------|\n");

    for point in 0..results.config.grid.len() {
        let label = row_label(&results.config.grid, point);
        match results.adjacency_for(point, n).map(|r| &r.outcome) {
            Some(Ok(r)) => table.push_str(&format!(
                "| {} | {:.3} | {:.2} | {} |\n",
                label,
                r.prob_n_given_suppressed,
                r.prob_n_plus_1_given_reported.value(),
                format_report_rate(&r.report_rate)
            )),
            Some(Err(_)) => table.push_str(&format!("| {} | error | error | error |\n", label)),
            None => table.push_str(&format!("| {} | - | - | - |\n", label)),
        }
    }

    table
}

/// Quote a CSV field if it contains separators or quotes.
fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Write report-probability rows to CSV.
pub fn write_frequency_csv(results: &SweepResults, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", FREQUENCY_CSV_HEADER)?;

    let comparator = results.config.comparator.name();
    for r in &results.frequency {
        let p = &results.config.grid[r.point];
        match &r.outcome {
            Ok(f) => writeln!(
                writer,
                "{},{},{},{},{},{},{},{:.6},",
                p.lower_bound,
                p.mean,
                p.standard_deviation,
                comparator,
                r.count,
                f.trials,
                f.reported,
                f.report_probability,
            )?,
            Err(e) => writeln!(
                writer,
                "{},{},{},{},{},{},,,{}",
                p.lower_bound,
                p.mean,
                p.standard_deviation,
                comparator,
                r.count,
                results.config.trials,
                csv_field(&e.to_string()),
            )?,
        }
    }

    writer.flush()
}

/// Write adjacent-pair rows to CSV.
pub fn write_adjacency_csv(results: &SweepResults, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", ADJACENCY_CSV_HEADER)?;

    let comparator = results.config.comparator.name();
    for r in &results.adjacency {
        let p = &results.config.grid[r.point];
        match &r.outcome {
            Ok(a) => writeln!(
                writer,
                "{},{},{},{},{},{},{},{},{:.6},{:.6},{},{},",
                p.lower_bound,
                p.mean,
                p.standard_deviation,
                comparator,
                r.n,
                a.trials,
                a.num_suppressed,
                a.num_reported,
                a.prob_n_given_suppressed,
                a.prob_n_plus_1_given_reported.value(),
                a.prob_n_plus_1_given_reported.is_insufficient(),
                a.report_rate.one_in().map(|k| k.to_string()).unwrap_or_default(),
            )?,
            Err(e) => writeln!(
                writer,
                "{},{},{},{},{},{},,,,,,,{}",
                p.lower_bound,
                p.mean,
                p.standard_deviation,
                comparator,
                r.n,
                results.config.trials,
                csv_field(&e.to_string()),
            )?,
        }
    }

    writer.flush()
}

fn adjacency_json(a: &AdjacencyResult) -> Value {
    let prob_reported = match a.prob_n_plus_1_given_reported {
        ConditionalEstimate::Observed(p) => json!(p),
        ConditionalEstimate::InsufficientSamples => Value::Null,
    };
    json!({
        "trials": a.trials,
        "num_suppressed": a.num_suppressed,
        "num_reported": a.num_reported,
        "prob_n_given_suppressed": a.prob_n_given_suppressed,
        "prob_n_plus_1_given_reported": prob_reported,
        "report_rate": a.report_rate,
    })
}

/// Serialize the full result set as pretty-printed JSON.
///
/// Failed work items carry an `error` object instead of estimates.
pub fn to_json(results: &SweepResults) -> serde_json::Result<String> {
    let frequency: Vec<Value> = results
        .frequency
        .iter()
        .map(|r| {
            let point = &results.config.grid[r.point];
            match &r.outcome {
                Ok(f) => json!({
                    "point": point,
                    "count": r.count,
                    "trials": f.trials,
                    "reported": f.reported,
                    "report_probability": f.report_probability,
                }),
                Err(e) => json!({
                    "point": point,
                    "count": r.count,
                    "error": { "parameter": e.parameter(), "message": e.to_string() },
                }),
            }
        })
        .collect();

    let adjacency: Vec<Value> = results
        .adjacency
        .iter()
        .map(|r| {
            let point = &results.config.grid[r.point];
            match &r.outcome {
                Ok(a) => {
                    let mut v = adjacency_json(a);
                    v["point"] = json!(point);
                    v["n"] = json!(r.n);
                    v
                }
                Err(e) => json!({
                    "point": point,
                    "n": r.n,
                    "error": { "parameter": e.parameter(), "message": e.to_string() },
                }),
            }
        })
        .collect();

    serde_json::to_string_pretty(&json!({
        "config": results.config,
        "total_time_s": results.total_time.as_secs_f64(),
        "frequency": frequency,
        "adjacency": adjacency,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::{SweepConfig, SweepPreset, SweepRunner};
    use lcf_sim::Comparator;

    fn run_small() -> SweepResults {
        let config = SweepConfig {
            preset: SweepPreset::Custom,
            grid: vec![GridPoint::new(1.5, 4.0, 0.0), GridPoint::new(1.5, 4.0, -1.0)],
            counts: vec![3, 5],
            adjacent_n: vec![1],
            trials: 500,
            seed: 1,
            comparator: Comparator::Strict,
        };
        SweepRunner::new().run(&config, |_, _| {}).unwrap()
    }

    #[test]
    fn report_rate_formatting() {
        assert_eq!(format_report_rate(&ReportRate::from_counts(25, 100)), "1/4");
        assert_eq!(format_report_rate(&ReportRate::from_counts(0, 100)), "1/100++");
    }

    #[test]
    fn markdown_contains_tables_and_failures() {
        let md = to_markdown(&run_small());
        assert!(md.contains("`lower=1.5`"));
        assert!(md.contains("| (4.0,0.0) | 0.0000 | 1.0000 |"));
        assert!(md.contains("| Config | Prob 1 AIDs (suppressed) | Prob 2 AIDs (reported) | Prob reported |"));
        // Counts 1 and 2 are always suppressed at a fixed threshold of 4
        assert!(md.contains("| 1.00 | 1/500++ |"));
        assert!(md.contains("## Failed Estimates"));
        assert!(md.contains("standard_deviation"));
    }

    #[test]
    fn overflowing_pair_renders_as_failed_row() {
        let config = SweepConfig {
            preset: SweepPreset::Custom,
            grid: vec![GridPoint::new(1.5, 4.0, 1.0)],
            counts: vec![],
            adjacent_n: vec![u64::MAX],
            trials: 100,
            seed: 3,
            comparator: Comparator::Strict,
        };
        let results = SweepRunner::new().run(&config, |_, _| {}).unwrap();
        assert!(results.adjacency[0].outcome.is_err());

        let md = to_markdown(&results);
        let heading = format!("## Adjacent Counts {} and {}+1", u64::MAX, u64::MAX);
        assert!(md.contains(&heading));
        assert!(md.contains("| (4.0,1.0) | error | error | error |"));
        assert!(md.contains("## Failed Estimates"));
        assert!(to_json(&results).is_ok());
    }

    #[test]
    fn upper_count_label_saturates_into_text() {
        assert_eq!(upper_count_label(1), "2");
        assert_eq!(upper_count_label(u64::MAX), format!("{}+1", u64::MAX));
    }

    #[test]
    fn csv_field_quotes_commas() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn json_marks_insufficient_samples_as_null() {
        let json = to_json(&run_small()).unwrap();
        let v: Value = serde_json::from_str(&json).unwrap();
        let first = &v["adjacency"][0];
        assert_eq!(first["prob_n_plus_1_given_reported"], Value::Null);
        assert_eq!(first["report_rate"]["kind"], "below_resolution");
        assert!(v["adjacency"][1]["error"]["message"].is_string());
    }
}
