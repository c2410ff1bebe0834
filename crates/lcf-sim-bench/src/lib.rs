//! Parameter sweeps and reports for LCF suppression estimates.
//!
//! This crate drives the `lcf-sim` estimators across a grid of threshold
//! distributions and renders the results.
//!
//! # Modules
//!
//! - [`sweep`]: grid presets, work items, and the parallel sweep runner
//! - [`output`]: markdown tables, CSV and JSON export
//! - [`error`]: sweep-level errors
//!
//! # Quick Start
//!
//! ```ignore
//! use lcf_sim_bench::{output, SweepConfig, SweepRunner};
//!
//! let results = SweepRunner::new().run(&SweepConfig::quick(), |_, _| {})?;
//! println!("{}", output::to_markdown(&results));
//! ```

pub mod error;
pub mod output;
pub mod sweep;

pub use error::SweepError;
pub use sweep::{
    AdjacencyRow, FrequencyRow, GridPoint, SweepConfig, SweepPreset, SweepResults, SweepRunner,
    WorkItem, WorkKind,
};
