//! Errors raised by the sweep layer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a whole sweep or its output.
///
/// Failures of individual work items are not represented here; they are
/// recorded in the result rows and the sweep continues.
#[derive(Debug, Error)]
pub enum SweepError {
    /// The sweep configuration itself is unusable.
    #[error("invalid sweep: {0}")]
    InvalidSweep(String),

    /// Estimation failed outside of per-item isolation.
    #[error(transparent)]
    Estimation(#[from] lcf_sim::LcfError),

    /// Reading a grid file or writing a report failed.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A grid file was not valid JSON for a sweep configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The dedicated worker pool could not be created.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}
