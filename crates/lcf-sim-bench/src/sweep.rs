//! Parameter sweep infrastructure for LCF calibration.
//!
//! This module provides:
//! - `SweepConfig`: grid of threshold distributions, counts and adjacent pairs
//! - `SweepRunner`: parallel execution of every (configuration, count) and
//!   (configuration, n) work item
//! - `SweepResults`: collected estimates, one row per work item
//!
//! # Example
//!
//! ```ignore
//! use lcf_sim_bench::sweep::{SweepConfig, SweepRunner};
//!
//! let config = SweepConfig::quick();
//! let results = SweepRunner::new().run(&config, |progress, task| {
//!     println!("{:.0}% - {}", progress * 100.0, task);
//! })?;
//!
//! println!("{}", lcf_sim_bench::output::to_markdown(&results));
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use lcf_sim::{
    estimate_adjacent_advantage, estimate_report_probability, worker_rng, AdjacencyResult,
    Comparator, FrequencyResult, LcfError, SuppressionConfig,
};
use serde::{Deserialize, Serialize};

use crate::error::SweepError;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Lower bound used by the built-in presets.
pub const PRESET_LOWER_BOUND: f64 = 1.5;

/// `(mean, sd)` pairs explored by the built-in presets.
const PRESET_MEAN_SD: [(f64, f64); 16] = [
    (3.0, 0.5),
    (3.5, 0.5),
    (4.0, 0.5),
    (4.0, 0.7),
    (4.0, 1.0),
    (5.0, 0.5),
    (5.0, 1.0),
    (5.0, 1.5),
    (6.0, 0.5),
    (6.0, 1.0),
    (6.0, 1.5),
    (6.0, 2.0),
    (7.0, 0.5),
    (7.0, 1.0),
    (7.0, 1.5),
    (7.0, 2.0),
];

/// Preset levels for sweep detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SweepPreset {
    /// Full calibration grid at 100 000 trials per estimate.
    LcfParams,
    /// Same grid at 10 000 trials, for fast feedback.
    Quick,
    /// Grid supplied by the caller.
    Custom,
}

impl SweepPreset {
    /// Get a short name for this preset
    pub fn name(&self) -> &'static str {
        match self {
            SweepPreset::LcfParams => "lcf-params",
            SweepPreset::Quick => "quick",
            SweepPreset::Custom => "custom",
        }
    }

    /// Parse a preset name as accepted on the command line.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lcf-params" | "lcf_params" | "full" => Some(SweepPreset::LcfParams),
            "quick" => Some(SweepPreset::Quick),
            "custom" => Some(SweepPreset::Custom),
            _ => None,
        }
    }
}

/// One threshold distribution in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    /// Hard lower bound of the threshold.
    pub lower_bound: f64,
    /// Mean of the threshold distribution.
    pub mean: f64,
    /// Standard deviation of the threshold distribution.
    pub standard_deviation: f64,
}

impl GridPoint {
    /// Create a grid point.
    pub fn new(lower_bound: f64, mean: f64, standard_deviation: f64) -> Self {
        Self {
            lower_bound,
            mean,
            standard_deviation,
        }
    }

    /// Validate and build the suppression configuration for this point.
    pub fn to_config(&self, comparator: Comparator) -> Result<SuppressionConfig, LcfError> {
        SuppressionConfig::new(self.lower_bound, self.mean, self.standard_deviation)
            .map(|c| c.with_comparator(comparator))
    }

    /// Row label in the `(mean,sd)` form.
    pub fn label(&self) -> String {
        format!("({:.1},{:?})", self.mean, self.standard_deviation)
    }
}

/// Configuration for a sweep.
///
/// Defines which threshold distributions, counts, and adjacent pairs to
/// estimate. Loadable from JSON; missing fields take the `lcf-params` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Preset level (informational)
    pub preset: SweepPreset,
    /// Threshold distributions to explore
    pub grid: Vec<GridPoint>,
    /// True counts for the report-probability table
    pub counts: Vec<u64>,
    /// Lower counts `n` of the adjacent pairs `(n, n + 1)`
    pub adjacent_n: Vec<u64>,
    /// Trials per estimate
    pub trials: u64,
    /// Base seed; work item `i` uses stream `i`
    pub seed: u64,
    /// Comparison operator for every grid point
    pub comparator: Comparator,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self::lcf_params()
    }
}

impl SweepConfig {
    /// Full calibration grid.
    ///
    /// - lower bound 1.5
    /// - 16 `(mean, sd)` pairs from (3, 0.5) to (7, 2.0)
    /// - counts 1..=9
    /// - adjacent pairs (1, 2) and (2, 3)
    /// - 100 000 trials per estimate
    pub fn lcf_params() -> Self {
        Self {
            preset: SweepPreset::LcfParams,
            grid: PRESET_MEAN_SD
                .iter()
                .map(|&(mean, sd)| GridPoint::new(PRESET_LOWER_BOUND, mean, sd))
                .collect(),
            counts: (1..=9).collect(),
            adjacent_n: vec![1, 2],
            trials: lcf_sim::constants::DEFAULT_TRIALS,
            seed: lcf_sim::constants::DEFAULT_SEED,
            comparator: Comparator::Strict,
        }
    }

    /// Quick preset: the full grid at 10 000 trials.
    pub fn quick() -> Self {
        Self {
            preset: SweepPreset::Quick,
            trials: 10_000,
            ..Self::lcf_params()
        }
    }

    /// Config for a named preset.
    pub fn for_preset(preset: SweepPreset) -> Self {
        match preset {
            SweepPreset::LcfParams => Self::lcf_params(),
            SweepPreset::Quick => Self::quick(),
            SweepPreset::Custom => Self {
                preset: SweepPreset::Custom,
                ..Self::lcf_params()
            },
        }
    }

    /// Load a sweep configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, SweepError> {
        let text = std::fs::read_to_string(path).map_err(|source| SweepError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        tracing::debug!(path = %path.display(), points = config.grid.len(), "loaded sweep grid");
        Ok(config)
    }

    /// Check the sweep-level constraints.
    ///
    /// Per-point problems (negative sd, mean below lower bound) are not
    /// checked here; they fail only the affected work items.
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.trials == 0 {
            return Err(SweepError::InvalidSweep("trials must be > 0".to_string()));
        }
        if self.grid.is_empty() {
            return Err(SweepError::InvalidSweep("grid must not be empty".to_string()));
        }
        if self.counts.is_empty() && self.adjacent_n.is_empty() {
            return Err(SweepError::InvalidSweep(
                "at least one count or adjacent pair is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of frequency work items.
    pub fn total_frequency_items(&self) -> usize {
        self.grid.len() * self.counts.len()
    }

    /// Number of adjacency work items.
    pub fn total_adjacency_items(&self) -> usize {
        self.grid.len() * self.adjacent_n.len()
    }

    /// Total number of work items.
    pub fn total_items(&self) -> usize {
        self.total_frequency_items() + self.total_adjacency_items()
    }

    /// Enumerate every work item. Frequency items come first, then
    /// adjacency items, each ordered by grid point.
    pub fn work_items(&self) -> Vec<WorkItem> {
        let frequency = self.grid.iter().enumerate().flat_map(move |(point, _)| {
            self.counts
                .iter()
                .map(move |&count| WorkKind::Frequency { point, count })
        });
        let adjacency = self.grid.iter().enumerate().flat_map(move |(point, _)| {
            self.adjacent_n
                .iter()
                .map(move |&n| WorkKind::Adjacency { point, n })
        });

        frequency
            .chain(adjacency)
            .enumerate()
            .map(|(stream, kind)| WorkItem {
                stream: stream as u64,
                kind,
            })
            .collect()
    }
}

/// What one work item estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkKind {
    /// Report probability of `count` under grid point `point`.
    Frequency {
        /// Index into `SweepConfig::grid`.
        point: usize,
        /// True count.
        count: u64,
    },
    /// Adjacent-pair advantage for `(n, n + 1)` under grid point `point`.
    Adjacency {
        /// Index into `SweepConfig::grid`.
        point: usize,
        /// Lower count of the pair.
        n: u64,
    },
}

/// A unit of independent work with its own random stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkItem {
    /// Stream index passed to `worker_rng(seed, stream)`.
    pub stream: u64,
    /// What to estimate.
    pub kind: WorkKind,
}

/// Report-probability estimate for one (grid point, count).
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyRow {
    /// Index into `SweepConfig::grid`.
    pub point: usize,
    /// True count.
    pub count: u64,
    /// The estimate, or the reason this item failed.
    pub outcome: Result<FrequencyResult, LcfError>,
}

/// Adjacent-pair estimate for one (grid point, n).
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyRow {
    /// Index into `SweepConfig::grid`.
    pub point: usize,
    /// Lower count of the pair.
    pub n: u64,
    /// The estimate, or the reason this item failed.
    pub outcome: Result<AdjacencyResult, LcfError>,
}

/// Collection of all sweep results.
#[derive(Debug, Clone)]
pub struct SweepResults {
    /// Configuration used
    pub config: SweepConfig,
    /// Report-probability rows, in work-item order
    pub frequency: Vec<FrequencyRow>,
    /// Adjacent-pair rows, in work-item order
    pub adjacency: Vec<AdjacencyRow>,
    /// Total execution time
    pub total_time: Duration,
}

impl SweepResults {
    /// Create new empty results
    pub fn new(config: SweepConfig) -> Self {
        Self {
            config,
            frequency: Vec::new(),
            adjacency: Vec::new(),
            total_time: Duration::ZERO,
        }
    }

    /// Row for a grid point and count.
    pub fn frequency_for(&self, point: usize, count: u64) -> Option<&FrequencyRow> {
        self.frequency
            .iter()
            .find(|r| r.point == point && r.count == count)
    }

    /// Row for a grid point and adjacent pair.
    pub fn adjacency_for(&self, point: usize, n: u64) -> Option<&AdjacencyRow> {
        self.adjacency.iter().find(|r| r.point == point && r.n == n)
    }

    /// Every failed work item as (grid point, task label, error).
    pub fn failures(&self) -> Vec<(usize, String, &LcfError)> {
        let frequency = self.frequency.iter().filter_map(|r| {
            r.outcome
                .as_ref()
                .err()
                .map(|e| (r.point, format!("count={}", r.count), e))
        });
        let adjacency = self.adjacency.iter().filter_map(|r| {
            r.outcome
                .as_ref()
                .err()
                .map(|e| (r.point, format!("n={}", r.n), e))
        });
        frequency.chain(adjacency).collect()
    }
}

enum ItemOutcome {
    Frequency(FrequencyRow),
    Adjacency(AdjacencyRow),
}

/// Sweep runner.
///
/// Dispatches every work item independently and collects the results.
#[derive(Debug, Clone, Default)]
pub struct SweepRunner {
    /// Worker threads; `None` uses the global rayon pool.
    threads: Option<usize>,
}

impl SweepRunner {
    /// Create a runner that uses the global thread pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Run on a dedicated pool with `threads` workers.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads.max(1));
        self
    }

    /// Run the sweep with a progress callback.
    ///
    /// # Arguments
    /// * `config` - Sweep configuration
    /// * `progress` - Callback receiving (progress_fraction, current_task);
    ///   may be invoked from worker threads
    ///
    /// # Failure isolation
    /// A grid point with an invalid configuration, or an adjacency item that
    /// never suppresses, yields an `Err` row; every other item still runs.
    ///
    /// # Parallelization Strategy
    /// Work items are independent, each with its own random stream derived
    /// from `config.seed`, so results do not depend on thread scheduling.
    pub fn run<F>(&self, config: &SweepConfig, progress: F) -> Result<SweepResults, SweepError>
    where
        F: Fn(f64, &str) + Sync,
    {
        config.validate()?;

        let start = Instant::now();
        let mut results = SweepResults::new(config.clone());

        // Resolve each grid point once; errors are reported per item
        let configs: Vec<Result<SuppressionConfig, LcfError>> = config
            .grid
            .iter()
            .map(|p| p.to_config(config.comparator))
            .collect();
        for (point, resolved) in configs.iter().enumerate() {
            if let Err(e) = resolved {
                tracing::warn!(point = %config.grid[point].label(), error = %e, "skipping grid point");
            }
        }

        let work_items = config.work_items();
        let total_work = work_items.len();
        let completed = AtomicUsize::new(0);

        tracing::info!(
            preset = config.preset.name(),
            items = total_work,
            trials = config.trials,
            "starting sweep"
        );
        progress(0.0, "Starting...");

        let run_item = |item: &WorkItem| -> ItemOutcome {
            let outcome = self.run_item(config, &configs, item);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            let task = match item.kind {
                WorkKind::Frequency { point, count } => {
                    format!("{} count={}", config.grid[point].label(), count)
                }
                WorkKind::Adjacency { point, n } => {
                    format!("{} n={}", config.grid[point].label(), n)
                }
            };
            progress(done as f64 / total_work as f64, &task);
            outcome
        };

        let outcomes = self.dispatch(&work_items, run_item)?;

        for outcome in outcomes {
            match outcome {
                ItemOutcome::Frequency(row) => results.frequency.push(row),
                ItemOutcome::Adjacency(row) => results.adjacency.push(row),
            }
        }

        progress(1.0, "Complete");

        results.total_time = start.elapsed();
        tracing::info!(
            elapsed_s = results.total_time.as_secs_f64(),
            failures = results.failures().len(),
            "sweep finished"
        );
        Ok(results)
    }

    #[cfg(feature = "parallel")]
    fn dispatch<F>(&self, items: &[WorkItem], run_item: F) -> Result<Vec<ItemOutcome>, SweepError>
    where
        F: Fn(&WorkItem) -> ItemOutcome + Sync,
    {
        match self.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| SweepError::ThreadPool(e.to_string()))?;
                Ok(pool.install(|| items.par_iter().map(&run_item).collect()))
            }
            None => Ok(items.par_iter().map(&run_item).collect()),
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn dispatch<F>(&self, items: &[WorkItem], run_item: F) -> Result<Vec<ItemOutcome>, SweepError>
    where
        F: Fn(&WorkItem) -> ItemOutcome + Sync,
    {
        if let Some(threads) = self.threads {
            tracing::debug!(threads, "built without `parallel`; running items sequentially");
        }
        Ok(items.iter().map(run_item).collect())
    }

    /// Run a single work item on its own stream.
    fn run_item(
        &self,
        config: &SweepConfig,
        configs: &[Result<SuppressionConfig, LcfError>],
        item: &WorkItem,
    ) -> ItemOutcome {
        let mut rng = worker_rng(config.seed, item.stream);

        match item.kind {
            WorkKind::Frequency { point, count } => {
                let outcome = configs[point].clone().and_then(|c| {
                    estimate_report_probability(count, &c, config.trials, &mut rng)
                });
                ItemOutcome::Frequency(FrequencyRow {
                    point,
                    count,
                    outcome,
                })
            }
            WorkKind::Adjacency { point, n } => {
                let outcome = configs[point]
                    .clone()
                    .and_then(|c| estimate_adjacent_advantage(n, &c, config.trials, &mut rng));
                if let Err(ref e) = outcome {
                    tracing::warn!(point = %config.grid[point].label(), n, error = %e, "adjacency estimate failed");
                }
                ItemOutcome::Adjacency(AdjacencyRow { point, n, outcome })
            }
        }
    }
}
