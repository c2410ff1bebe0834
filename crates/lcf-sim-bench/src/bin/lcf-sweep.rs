//! CLI tool for running LCF parameter sweeps.
//!
//! # Usage
//!
//! ```bash
//! # Full calibration grid (100k trials per estimate)
//! cargo run --release --bin lcf-sweep -- --preset lcf-params
//!
//! # Quick run, non-strict comparison, results in ./out/
//! cargo run --release --bin lcf-sweep -- --preset quick --comparator non-strict --output ./out/
//!
//! # Custom grid from a JSON file, overriding counts and pairs
//! cargo run --release --bin lcf-sweep -- --grid grid.json --counts "1,2,3,4" --adjacent "1,2,3"
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use lcf_sim::Comparator;
use lcf_sim_bench::output::{
    to_json, to_markdown, upper_count_label, write_adjacency_csv, write_frequency_csv,
};
use lcf_sim_bench::{SweepConfig, SweepPreset, SweepRunner};

/// Low Count Filter parameter sweep
#[derive(Parser, Debug)]
#[command(name = "lcf-sweep")]
#[command(about = "Estimate LCF report probabilities and adjacent-count inference across a parameter grid")]
#[command(version)]
struct Args {
    /// Preset configuration: lcf-params (100k trials), quick (10k trials)
    #[arg(short, long, default_value = "lcf-params")]
    preset: String,

    /// JSON file with a sweep configuration (overrides preset)
    #[arg(short, long)]
    grid: Option<PathBuf>,

    /// Output directory for results
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Trials per estimate (overrides preset)
    #[arg(long)]
    trials: Option<u64>,

    /// Base seed for the random streams (overrides preset)
    #[arg(long)]
    seed: Option<u64>,

    /// True counts for the report-probability table (comma-separated)
    #[arg(long)]
    counts: Option<String>,

    /// Lower counts n of adjacent pairs (n, n+1) (comma-separated)
    #[arg(long)]
    adjacent: Option<String>,

    /// Comparison operator: strict (count < threshold) or non-strict (count <= threshold)
    #[arg(long)]
    comparator: Option<String>,

    /// Worker threads (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Skip writing CSV output files
    #[arg(long)]
    no_csv: bool,

    /// Also write results as JSON
    #[arg(long)]
    json: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Hide the progress bar and the printed report
    #[arg(short, long)]
    quiet: bool,
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn parse_list(s: &str) -> Result<Vec<u64>, String> {
    s.split(',')
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .map(|x| x.parse::<u64>().map_err(|e| format!("invalid value '{}': {}", x, e)))
        .collect()
}

fn build_config(args: &Args) -> Result<SweepConfig, String> {
    let mut config = if let Some(path) = &args.grid {
        SweepConfig::from_json_file(path).map_err(|e| e.to_string())?
    } else {
        let preset = SweepPreset::parse(&args.preset)
            .ok_or_else(|| format!("unknown preset '{}'. Available: lcf-params, quick", args.preset))?;
        SweepConfig::for_preset(preset)
    };

    if let Some(trials) = args.trials {
        config.trials = trials;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(counts) = &args.counts {
        config.counts = parse_list(counts)?;
    }
    if let Some(adjacent) = &args.adjacent {
        config.adjacent_n = parse_list(adjacent)?;
    }
    if let Some(comparator) = &args.comparator {
        config.comparator = Comparator::parse(comparator).ok_or_else(|| {
            format!("unknown comparator '{}'. Available: strict, non-strict", comparator)
        })?;
    }

    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    if !args.output.exists() {
        if let Err(e) = fs::create_dir_all(&args.output) {
            eprintln!("{} failed to create output directory: {}", "error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    }

    if !args.quiet {
        println!("{}\n", "=== LCF Parameter Sweep ===".bold());
        println!("Configuration:");
        println!("  Preset: {}", config.preset.name());
        println!("  Grid points: {}", config.grid.len());
        println!("  Counts: {:?}", config.counts);
        let pairs: Vec<String> = config
            .adjacent_n
            .iter()
            .map(|&n| format!("({}, {})", n, upper_count_label(n)))
            .collect();
        println!("  Adjacent pairs: [{}]", pairs.join(", "));
        println!("  Trials per estimate: {}", config.trials);
        println!("  Seed: {}", config.seed);
        println!("  Comparator: {}", config.comparator.name());
        println!("  Total work items: {}", config.total_items());
        println!();
    }

    let mut runner = SweepRunner::new();
    if let Some(threads) = args.threads {
        runner = runner.threads(threads);
    }

    let total_work = config.total_items() as u64;
    let progress_bar = if args.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(total_work);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta} | {msg}",
        ) {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        bar
    };

    let start = Instant::now();
    let results = runner.run(&config, |progress, task| {
        progress_bar.set_position((progress * total_work as f64) as u64);
        progress_bar.set_message(task.to_string());
    });
    progress_bar.finish_with_message("Complete!");

    let results = match results {
        Ok(results) => results,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    if !args.quiet {
        println!("\nCompleted in {:.1}s\n", start.elapsed().as_secs_f64());
    }

    let mut write_failed = false;

    if !args.no_csv {
        let frequency_path = args.output.join("lcf_report_probability.csv");
        match write_frequency_csv(&results, &frequency_path) {
            Ok(()) => println!("Wrote report probabilities to: {}", frequency_path.display()),
            Err(e) => {
                eprintln!("{} failed to write CSV: {}", "error:".red().bold(), e);
                write_failed = true;
            }
        }

        let adjacency_path = args.output.join("lcf_adjacent_pairs.csv");
        match write_adjacency_csv(&results, &adjacency_path) {
            Ok(()) => println!("Wrote adjacent-pair estimates to: {}", adjacency_path.display()),
            Err(e) => {
                eprintln!("{} failed to write CSV: {}", "error:".red().bold(), e);
                write_failed = true;
            }
        }
    }

    if args.json {
        let json_path = args.output.join("lcf_results.json");
        let written = to_json(&results)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&json_path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => println!("Wrote JSON results to: {}", json_path.display()),
            Err(e) => {
                eprintln!("{} failed to write JSON: {}", "error:".red().bold(), e);
                write_failed = true;
            }
        }
    }

    let md_path = args.output.join("lcf_report.md");
    let report = to_markdown(&results);
    match fs::write(&md_path, &report) {
        Ok(()) => println!("Wrote report to: {}", md_path.display()),
        Err(e) => {
            eprintln!("{} failed to write markdown report: {}", "error:".red().bold(), e);
            write_failed = true;
        }
    }

    let failures = results.failures();
    if !failures.is_empty() {
        eprintln!(
            "{} {} estimate(s) failed; see the report for details",
            "warning:".yellow().bold(),
            failures.len()
        );
    }

    if !args.quiet {
        println!("\n{}", report);
    }

    if write_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
